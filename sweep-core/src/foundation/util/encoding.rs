use crate::foundation::error::SweepError;
use crate::foundation::Hash32;

pub fn decode_hex(s: &str) -> Result<Vec<u8>, SweepError> {
    hex::decode(s).map_err(|e| e.into())
}

/// Parse a 32-byte hash from hex, accepting an optional `0x` prefix.
pub fn parse_hex_32bytes(s: &str) -> Result<Hash32, SweepError> {
    let trimmed = s.trim_start_matches("0x").trim_start_matches("0X");
    let bytes = decode_hex(trimmed)?;
    let mut out = [0u8; 32];
    if bytes.len() != out.len() {
        return Err(SweepError::EncodingError(format!("expected 32 bytes, got {}", bytes.len())));
    }
    out.copy_from_slice(&bytes);
    Ok(out)
}
