// File: src/utils/mod.rs
pub mod encode;

pub use encode::encode_base64url;

use threedsecure_common::Error;

/// Unwraps a field a state guarantees to be present. Absence is a
/// protocol violation surfaced as a validation error, not something to
/// recover from.
pub fn require<'a, T>(value: Option<&'a T>, what: &str) -> Result<&'a T, Error>
where
    T: ?Sized,
{
    value.ok_or_else(|| Error::Validation(format!("{what} is required")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_passes_through_present_values() {
        let value: Option<String> = Some("acs".into());
        assert_eq!(require(value.as_deref(), "acsUrl").unwrap(), "acs");
    }

    #[test]
    fn require_names_the_missing_field() {
        let missing: Option<String> = None;
        let err = require(missing.as_deref(), "acsUrl").unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == "acsUrl is required"));
    }
}
