//! Error types for the leasegen library.
//!
//! The three failure tiers of a submission map onto distinct types:
//!
//! * [`crate::pipeline::validate::ValidationErrors`] (**user-correctable**):
//!   the contract data breaks one or more rules. Carried inside
//!   [`LeaseGenError::Validation`] and produced before any file I/O.
//!
//! * [`LeaseGenError`] (**Fatal**): the document cannot be rendered (missing
//!   template, placeholder mismatch, write failure). No artifact is exposed.
//!
//! * [`ConversionError`] (**Non-fatal**): the PDF conversion failed. Stored in
//!   [`crate::output::GeneratedContract`] next to the primary artifact, which
//!   remains deliverable.

use crate::pipeline::validate::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the leasegen library.
///
/// PDF conversion failures use [`ConversionError`] and never abort a
/// submission.
#[derive(Debug, Error)]
pub enum LeaseGenError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Contract data file was not found at the given path.
    #[error("Contract data file not found: '{path}'\nCheck the path exists and is readable.")]
    InputNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The contract data is not well-formed JSON for a [`crate::ContractInput`].
    #[error("Invalid contract data in '{origin}': {detail}")]
    InvalidInput { origin: String, detail: String },

    /// The contract data failed validation. Every violated rule is listed.
    #[error("Contract data is invalid:\n{0}")]
    Validation(ValidationErrors),

    /// A value could not be put into its textual form.
    #[error("Failed to normalise contract data: {0}")]
    Normalize(#[from] NormalizeError),

    // ── Template errors ───────────────────────────────────────────────────
    /// Template file was not found at the configured path.
    #[error("Template file not found: '{path}'\nExpected a .docx (or .txt) template; run `leasegen init-template` to create one.")]
    TemplateNotFound { path: PathBuf },

    /// Template exists but could not be read or decoded.
    #[error("Failed to load template '{path}': {detail}")]
    TemplateUnreadable { path: PathBuf, detail: String },

    /// Template extension is neither `.docx` nor `.txt`.
    #[error("Unsupported template '{path}': expected a .docx or .txt file")]
    UnsupportedTemplate { path: PathBuf },

    /// Template content does not match the render context.
    #[error("Failed to render template '{path}': {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: TemplateError,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output artifact.
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

/// Placeholder scanning or substitution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{{ … }}` tag whose content is not a placeholder name.
    #[error("invalid placeholder '{{{{{fragment}}}}}'")]
    InvalidPlaceholder { fragment: String },

    /// A `{{` with no closing `}}`.
    #[error("unclosed placeholder starting at byte {offset}")]
    Unclosed { offset: usize },

    /// Placeholders referenced by the template but absent from the context.
    #[error("placeholders missing from context: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),
}

/// A value that cannot be rendered into its fixed textual form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// Month number outside 1–12.
    #[error("month {0} is out of range (expected 1-12)")]
    MonthOutOfRange(u32),

    /// NaN or infinite monetary amount.
    #[error("amount {0} is not a finite number")]
    NonFiniteAmount(f64),

    /// Too large to count in minor units.
    #[error("amount {0} is too large to format")]
    AmountOutOfRange(f64),

    /// More decimal places than the minor-unit counter can hold.
    #[error("{0} currency decimals cannot be formatted")]
    DecimalsOutOfRange(u8),
}

/// A non-fatal failure of the PDF conversion step.
///
/// Stored in [`crate::output::GeneratedContract::conversion_error`]; the
/// primary document is still delivered.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ConversionError {
    /// The converter executable is not installed or not on `PATH`.
    #[error("converter '{program}' not found; PDF conversion requires LibreOffice to be installed")]
    ConverterNotFound { program: String },

    /// The converter could not be started.
    #[error("failed to start converter '{program}': {detail}")]
    SpawnFailed { program: String, detail: String },

    /// The converter did not finish in time and was killed.
    #[error("conversion timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The converter exited unsuccessfully.
    #[error("converter exited with {}: {stderr}", .code.map_or_else(|| "signal".to_string(), |c| format!("code {c}")))]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// The converter reported success but produced no file.
    #[error("converter produced no output at '{path}'")]
    MissingOutput { path: PathBuf },
}
