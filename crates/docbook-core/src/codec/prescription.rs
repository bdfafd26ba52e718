//! Prescription encoder/decoder.
//!
//! Payload format (JSON, one line):
//!
//! ```text
//! {"v":1,"rx":{"patient_name":...,"medicines":[...],...},"sum":"<16 hex>"}
//! ```
//!
//! `sum` is the first 8 bytes of SHA-256 over the serialized `rx` object,
//! enough to reject truncated or hand-edited codes.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::Prescription;

use super::{DecodeError, DecodeResult, EncodeError};

/// Current payload version.
pub const PAYLOAD_VERSION: u32 = 1;

/// Byte-mode capacity of a version 40 QR code at error-correction level L.
pub const MAX_PAYLOAD_BYTES: usize = 2953;

/// Number of digest bytes kept in the checksum.
const CHECKSUM_BYTES: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    v: u32,
    rx: Prescription,
    sum: String,
}

/// Encode a prescription into a QR payload.
pub fn encode(prescription: &Prescription) -> Result<String, EncodeError> {
    prescription.validate()?;

    let envelope = Envelope {
        v: PAYLOAD_VERSION,
        rx: prescription.clone(),
        sum: checksum(prescription)?,
    };
    let payload = serde_json::to_string(&envelope)?;

    if payload.len() > MAX_PAYLOAD_BYTES {
        return Err(EncodeError::TooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD_BYTES,
        });
    }

    log::debug!("Encoded prescription payload ({} bytes)", payload.len());
    Ok(payload)
}

/// Decode a scanned payload.
pub fn decode(payload: &str) -> DecodeResult<Prescription> {
    let payload = payload.trim();
    if payload.is_empty() {
        return Err(DecodeError::NoScannableCode);
    }

    let envelope: Envelope = serde_json::from_str(payload).map_err(|e| {
        log::debug!("Rejected payload: {}", e);
        DecodeError::NotRecognized("not a structured prescription".into())
    })?;

    if envelope.v != PAYLOAD_VERSION {
        return Err(DecodeError::NotRecognized(format!(
            "unsupported payload version {}",
            envelope.v
        )));
    }

    let expected = checksum(&envelope.rx)
        .map_err(|e| DecodeError::NotRecognized(e.to_string()))?;
    if !expected.eq_ignore_ascii_case(&envelope.sum) {
        log::warn!("Prescription payload checksum mismatch");
        return Err(DecodeError::NotRecognized("checksum mismatch".into()));
    }

    envelope
        .rx
        .validate()
        .map_err(|e| DecodeError::NotRecognized(e.to_string()))?;

    Ok(envelope.rx)
}

/// Decode the result of a camera scan; `None` means the scanner found no code.
pub fn decode_scan(scanned: Option<&str>) -> DecodeResult<Prescription> {
    match scanned {
        Some(text) => decode(text),
        None => Err(DecodeError::NoScannableCode),
    }
}

fn checksum(prescription: &Prescription) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_string(prescription)?;
    let digest = Sha256::digest(canonical.as_bytes());
    Ok(hex::encode(&digest[..CHECKSUM_BYTES]))
}
