// File: threedsecure-common/src/traits/frame_traits.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::ChallengeWindowSize;

/// How the frame backing a submission is presented by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Invisible fingerprinting frame.
    DsMethod,
    /// Visible challenge frame sized per the EMVCo window code.
    Challenge(ChallengeWindowSize),
}

/// A one-time hidden cross-origin form POST: one opaque field, one
/// target frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    /// Issuer URL the form posts to (DS-method or ACS challenge URL).
    pub action_url: String,
    /// Name of the single form field (`threeDSMethodData` or `creq`).
    pub field_name: String,
    /// base64url-encoded JSON payload.
    pub payload: String,
    pub frame: FrameKind,
}

/// Capability the handlers delegate DOM plumbing to: create the hidden
/// form and its target frame inside the host container, submit once,
/// and resolve when the frame signals load (or fail on error).
///
/// Implementations own the transient frame/form resources they create;
/// `clean` releases them and must be idempotent and safe to call even
/// if `submit` never ran.
#[async_trait]
pub trait FormGateway: Send + Sync {
    async fn submit(&self, submission: FormSubmission) -> Result<(), Error>;
    async fn clean(&self) -> Result<(), Error>;
}
