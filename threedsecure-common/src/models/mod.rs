// File: threedsecure-common/src/models/mod.rs
pub mod authentication;
pub mod browser;
pub mod challenge;
pub mod result;

pub use authentication::{Authentication, AuthenticationState, ThreeDSecureParameters};
pub use browser::BrowserData;
pub use challenge::{ChallengeWindowSize, MountPoint};
pub use result::ThreeDSecureResult;
