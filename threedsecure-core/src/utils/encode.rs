// File: src/utils/encode.rs

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;

use threedsecure_common::Error;

/// Serializes `value` to JSON and base64url-encodes it (no padding),
/// the format both issuer form fields expect.
pub fn encode_base64url<T: Serialize>(value: &T) -> Result<String, Error> {
    let json = serde_json::to_vec(value)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}
