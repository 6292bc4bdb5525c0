pub mod consent;
pub mod targeting;

pub use consent::{ConsentSnapshot, ConsentStore};
pub use targeting::{TargetingSnapshot, TargetingStore, UserGender};
