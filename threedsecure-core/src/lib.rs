// src/lib.rs

pub mod api;
pub mod cancel;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod services;
pub mod sources;
pub mod utils;

pub use threedsecure_common::Error;
pub use threedsecure_common::error::CancelReason;
pub use threedsecure_common::models::{
    Authentication, AuthenticationState, BrowserData, ChallengeWindowSize, MountPoint,
    ThreeDSecureParameters, ThreeDSecureResult,
};
pub use threedsecure_common::traits::{AuthenticationSource, FormGateway, FormSubmission, FrameKind};

pub use api::{ApiClient, SourceStrategy};
pub use cancel::{CancelHandle, CancelToken};
pub use http::{HttpTransport, ReqwestTransport};
pub use services::{ThreeDSecureOptions, ThreeDSecureService};
