//! SDP offers relayed to the realtime negotiation endpoints.
//!
//! The Session Description Protocol text is opaque here. The only check is a
//! minimum length so obviously empty or truncated bodies are rejected before an
//! upstream call is made; the text is forwarded exactly as received.

use thiserror::Error;

/// Shortest accepted offer, measured after trimming surrounding whitespace
pub const MIN_SDP_LENGTH: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdpError {
    #[error("SDP offer is required")]
    Missing,

    #[error("SDP offer is too short ({0} characters, minimum {MIN_SDP_LENGTH})")]
    TooShort(usize),
}

/// A validated, unmodified SDP offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpOffer(String);

impl SdpOffer {
    /// Validate an offer without altering it
    pub fn parse(raw: impl Into<String>) -> Result<Self, SdpError> {
        let raw = raw.into();
        let trimmed_len = raw.trim().chars().count();

        if trimmed_len == 0 {
            return Err(SdpError::Missing);
        }
        if trimmed_len < MIN_SDP_LENGTH {
            return Err(SdpError::TooShort(trimmed_len));
        }

        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SdpOffer {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
