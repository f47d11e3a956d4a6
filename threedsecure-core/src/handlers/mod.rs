//! Side-effect handlers for the two issuer-driven steps. Both follow
//! the same protocol: validate the snapshot's required fields, encode
//! the payload, submit a one-time hidden form through the gateway, and
//! resolve when the frame signals load.

pub mod challenge;
pub mod ds_method;

pub use challenge::ChallengeService;
pub use ds_method::DsMethodService;
