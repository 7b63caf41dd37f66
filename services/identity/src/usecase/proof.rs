use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use crate::error::IdentityServiceError;

/// Decode a base64 biometric proof. Browser data URLs
/// (`data:image/jpeg;base64,...`) are accepted as well as bare base64.
pub fn decode_proof(proof: &str) -> Result<Bytes, IdentityServiceError> {
    let trimmed = proof.trim();
    let encoded = match trimmed.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => trimmed,
    };
    if encoded.is_empty() {
        return Err(IdentityServiceError::BadRequest(
            "proof must not be empty".to_owned(),
        ));
    }
    STANDARD
        .decode(encoded)
        .map(Bytes::from)
        .map_err(|_| IdentityServiceError::BadRequest("proof is not valid base64".to_owned()))
}
