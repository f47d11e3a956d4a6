// File: threedsecure-common/src/traits/mod.rs
pub mod frame_traits;
pub mod source_traits;

pub use frame_traits::{FormGateway, FormSubmission, FrameKind};
pub use source_traits::AuthenticationSource;
