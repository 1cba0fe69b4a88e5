//! Error types for the edgequake-topic2pptx library.
//!
//! A single fatal error type, [`DeckError`], is returned by every public
//! entry point. The one recoverable failure in the pipeline, a completion
//! reply that cannot be parsed as a slide array, never reaches callers: the
//! sanitizer converts it into a fixed fallback deck (see
//! [`crate::pipeline::sanitize`]).
//!
//! Nothing in the library retries. A `Service` error means the current
//! request produced no artifact and no preview; the next request starts from
//! a clean state.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-topic2pptx library.
#[derive(Debug, Error)]
pub enum DeckError {
    // ── Completion errors ─────────────────────────────────────────────────
    /// The completion call failed: invalid or expired credential, quota,
    /// transient network failure, or an unusable service reply.
    #[error("Completion service error: {detail}")]
    Service { detail: String },

    /// The configured provider is not initialised (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── Style errors ──────────────────────────────────────────────────────
    /// A font family, size tier or color theme is not in the lookup tables.
    #[error("Style configuration error: {0}")]
    Configuration(String),

    // ── Document errors ───────────────────────────────────────────────────
    /// Building or serialising the presentation failed.
    #[error("Failed to assemble presentation: {0}")]
    Assembly(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output presentation file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<quick_xml::Error> for DeckError {
    fn from(e: quick_xml::Error) -> Self {
        DeckError::Assembly(format!("XML write failed: {e}"))
    }
}

impl From<zip::result::ZipError> for DeckError {
    fn from(e: zip::result::ZipError) -> Self {
        DeckError::Assembly(format!("ZIP write failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_display() {
        let e = DeckError::Service {
            detail: "401 invalid api key".into(),
        };
        assert!(e.to_string().contains("401 invalid api key"));
    }

    #[test]
    fn configuration_error_display() {
        let e = DeckError::Configuration("unknown color theme 'Neon Pink'".into());
        let msg = e.to_string();
        assert!(msg.contains("Neon Pink"), "got: {msg}");
    }

    #[test]
    fn output_write_failed_keeps_source() {
        use std::error::Error as _;
        let e = DeckError::OutputWriteFailed {
            path: PathBuf::from("/nope/deck.pptx"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.to_string().contains("/nope/deck.pptx"));
        assert!(e.source().is_some());
    }

    #[test]
    fn zip_error_maps_to_assembly() {
        let e: DeckError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(e, DeckError::Assembly(_)));
    }
}
