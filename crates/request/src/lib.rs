//! Bid request assembly: composable parameter builders driven in a fixed
//! order over one OpenRTB request.
//!
//! The host configures an [`SdkConfig`](bidforge_core::SdkConfig) plus the
//! consent and targeting stores, takes snapshots of both, and hands
//! everything to a [`BidRequestAssembler`]. Each configured ad unit
//! contributes exactly one impression, in order.

pub mod app_info;
pub mod basic;
pub mod device_info;
pub mod pipeline;
pub mod prebid;
pub mod user_consent;

pub use app_info::AppInfoParameterBuilder;
pub use basic::BasicParameterBuilder;
pub use device_info::DeviceInfoParameterBuilder;
pub use pipeline::{BidRequestAssembler, ParameterBuilder};
pub use prebid::PrebidParameterBuilder;
pub use user_consent::UserConsentParameterBuilder;
