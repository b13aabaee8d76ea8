//! # leasegen
//!
//! Generate urban lease contracts ("Contrato de Arrendamento Urbano") from
//! structured tenant data and a document template.
//!
//! ## Why this crate?
//!
//! A lease contract is mostly fixed text with a couple of dozen variable
//! fields. Filling them by hand invites typos in IBANs, inconsistent money
//! formatting and stale dates. This crate validates the submission up front,
//! normalises every value into the exact textual form the contract expects,
//! substitutes it into a plain-text or DOCX template, and optionally asks an
//! office suite to produce a PDF alongside.
//!
//! ## Pipeline Overview
//!
//! ```text
//! ContractInput (JSON)
//!  │
//!  ├─ 1. Validate   collect every rule violation, no I/O on failure
//!  ├─ 2. Normalise  trim text, format money and dates, signing line
//!  ├─ 3. Context    fixed placeholder vocabulary (25 keys)
//!  ├─ 4. Render     {{ key }} substitution into .txt / .docx (spawn_blocking)
//!  ├─ 5. Convert    external converter under a timeout (optional, non-fatal)
//!  └─ 6. Output     artifacts in a scoped working directory
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use leasegen::{generate, load_input, GeneratorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input = load_input("contract.json").await?;
//!     let config = GeneratorConfig::builder()
//!         .template_path("contract_template.docx")
//!         .build()?;
//!     let contract = generate(&input, &config).await?;
//!     let summary = contract.save_to("out").await?;
//!     println!("{}", summary.primary.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `leasegen` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ```toml
//! leasegen = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod boilerplate;
pub mod config;
pub mod contract;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use boilerplate::{Boilerplate, DEFAULT_TEMPLATE};
pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use contract::{ContractInput, DocumentType};
pub use error::{ConversionError, LeaseGenError, NormalizeError, TemplateError};
pub use generate::{
    audit_template, generate, generate_as_of, generate_sync, generate_to_dir, TemplateAudit,
};
pub use output::{Artifact, GeneratedContract, GenerationStats, GenerationSummary};
pub use pipeline::context::{RenderContext, PLACEHOLDER_KEYS};
pub use pipeline::input::{load_input, parse_input};
pub use pipeline::normalize::CurrencyFormat;
pub use pipeline::validate::{validate, ValidationError, ValidationErrors};
pub use progress::{GenerationProgressCallback, NoopProgressCallback, ProgressCallback};
