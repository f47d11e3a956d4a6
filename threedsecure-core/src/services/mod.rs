// File: src/services/mod.rs
pub mod threedsecure_service;

pub use threedsecure_service::{ThreeDSecureOptions, ThreeDSecureService};
