//! Decode HTML files whose encoding is not known up front

use encoding_rs::{Encoding, UTF_8};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{GalleryError, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Text of a file together with the encoding that decoded it
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    pub encoding: &'static Encoding,
}

/// Resolve labels to encodings, preferred first, dropping unknown labels and duplicates
pub fn candidate_encodings(preferred: &str, fallbacks: &[String]) -> Vec<&'static Encoding> {
    let mut candidates: Vec<&'static Encoding> = Vec::new();
    for label in std::iter::once(preferred).chain(fallbacks.iter().map(String::as_str)) {
        match Encoding::for_label(label.trim().as_bytes()) {
            Some(enc) => {
                if !candidates.contains(&enc) {
                    candidates.push(enc);
                }
            }
            None => warn!("Unknown encoding '{}', ignoring", label),
        }
    }
    candidates
}

/// Strict decode: any malformed sequence fails the candidate
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let bytes = if encoding == UTF_8 {
        bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
    } else {
        bytes
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Read a file trying the preferred encoding, then each fallback in order
pub fn read_with_fallback(path: &Path, preferred: &str, fallbacks: &[String]) -> Result<Decoded> {
    let bytes = fs::read(path).map_err(|source| GalleryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let candidates = candidate_encodings(preferred, fallbacks);
    for &encoding in &candidates {
        match decode_bytes(&bytes, encoding) {
            Some(text) => {
                debug!("Decoded {} as {}", path.display(), encoding.name());
                return Ok(Decoded { text, encoding });
            }
            None => debug!("Failed to read {} with {}", path.display(), encoding.name()),
        }
    }

    Err(GalleryError::Decode {
        path: path.to_path_buf(),
        tried: candidates.iter().map(|e| e.name().to_string()).collect(),
    })
}
