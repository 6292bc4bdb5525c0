pub mod adunit;
pub mod config;
pub mod error;
pub mod ortb;
pub mod types;

pub use adunit::{AdUnitConfig, VideoParameters};
pub use config::SdkConfig;
pub use error::{BidForgeError, BidForgeResult};
