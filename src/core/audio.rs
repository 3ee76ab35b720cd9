//! Audio payload carried between the browser and the pipeline.
//!
//! Audio crosses the HTTP boundary as standard-alphabet base64 text. Padding is
//! optional and ASCII whitespace (line wrapping) is ignored. The bytes
//! themselves are opaque: no decoding, resampling or container validation is
//! performed. The declared format only names the container for the upstream
//! transcription call (`audio.<format>`, `audio/<format>`).

use base64::{
    Engine, alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD},
};
use thiserror::Error;

/// Container assumed when the client does not declare one
pub const DEFAULT_INPUT_FORMAT: &str = "wav";

/// Longest accepted format tag
const MAX_FORMAT_LEN: usize = 10;

/// Standard alphabet, padded or not
const LENIENT_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors raised while building an [`AudioPayload`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("Audio data required")]
    Missing,

    #[error("Audio data is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("Unsupported audio format: {0}")]
    InvalidFormat(String),
}

/// Decoded audio with its declared container format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    data: Vec<u8>,
    format: String,
}

impl AudioPayload {
    /// Wrap raw bytes
    ///
    /// # Errors
    /// * [`AudioError::Missing`] when `data` is empty
    /// * [`AudioError::InvalidFormat`] when the tag is not a short word of
    ///   lowercase alphanumerics and `-`
    pub fn new(data: Vec<u8>, format: &str) -> Result<Self, AudioError> {
        if data.is_empty() {
            return Err(AudioError::Missing);
        }
        Ok(Self {
            data,
            format: normalize_format(format)?,
        })
    }

    /// Decode a base64 payload sent by a client
    ///
    /// `format` defaults to [`DEFAULT_INPUT_FORMAT`] when absent or blank.
    pub fn from_base64(encoded: &str, format: Option<&str>) -> Result<Self, AudioError> {
        let encoded: Vec<u8> = encoded
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        if encoded.is_empty() {
            return Err(AudioError::Missing);
        }

        let data = LENIENT_DECODER
            .decode(&encoded)
            .map_err(|e| AudioError::InvalidEncoding(e.to_string()))?;

        let format = format
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_INPUT_FORMAT);

        Self::new(data, format)
    }

    /// Encode the bytes for transport
    pub fn to_base64(&self) -> String {
        encode_base64(&self.data)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File name presented to the transcription endpoint
    pub fn file_name(&self) -> String {
        format!("audio.{}", self.format)
    }

    /// MIME type presented to the transcription endpoint
    pub fn mime_type(&self) -> String {
        format!("audio/{}", self.format)
    }
}

/// Encode arbitrary bytes as standard base64
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

fn normalize_format(format: &str) -> Result<String, AudioError> {
    let format = format.trim().to_ascii_lowercase();
    let valid = !format.is_empty()
        && format.len() <= MAX_FORMAT_LEN
        && format.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');

    if !valid {
        return Err(AudioError::InvalidFormat(format));
    }
    Ok(format)
}
