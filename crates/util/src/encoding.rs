//! Base64 transport encoding for state blobs.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded bytes are not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub fn encode_base64(data: &str) -> String {
    STANDARD.encode(data.as_bytes())
}

/// Decodes standard base64 into a UTF-8 string. Surrounding whitespace is ignored.
pub fn decode_base64(encoded: &str) -> Result<String, EncodingError> {
    let bytes = STANDARD.decode(encoded.trim())?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_what_it_encodes() {
        let encoded = encode_base64(r#"["{}","abc"]"#);
        assert_eq!(decode_base64(&format!(" {encoded}\n")).expect("decode"), r#"["{}","abc"]"#);
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(decode_base64("%%%"), Err(EncodingError::Base64(_))));
        assert!(matches!(decode_base64("/w=="), Err(EncodingError::Utf8(_))));
    }
}
