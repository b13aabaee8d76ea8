//! Progress-callback trait for generation stage events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::GeneratorConfigBuilder::progress_callback`] to be told
//! when each stage of a submission starts and ends. The CLI uses it to drive
//! its spinner; a web front end could forward the same events to the browser.
//!
//! # Example
//!
//! ```rust
//! use leasegen::{GenerationProgressCallback, GeneratorConfig};
//! use std::sync::Arc;
//!
//! struct Log;
//!
//! impl GenerationProgressCallback for Log {
//!     fn on_render_complete(&self, file_name: &str, size_bytes: u64) {
//!         eprintln!("rendered {file_name} ({size_bytes} bytes)");
//!     }
//! }
//!
//! let config = GeneratorConfig::builder()
//!     .progress_callback(Arc::new(Log) as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the generator as a submission moves through its stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait GenerationProgressCallback: Send + Sync {
    /// Validation rejected the input; nothing else will run.
    fn on_validation_failed(&self, error_count: usize) {
        let _ = error_count;
    }

    /// Rendering of the primary document is about to start.
    fn on_render_start(&self, template: &str) {
        let _ = template;
    }

    /// The primary document was written.
    fn on_render_complete(&self, file_name: &str, size_bytes: u64) {
        let _ = (file_name, size_bytes);
    }

    /// The external converter is being launched.
    fn on_conversion_start(&self, program: &str) {
        let _ = program;
    }

    /// The PDF was produced.
    fn on_conversion_complete(&self, file_name: &str) {
        let _ = file_name;
    }

    /// The PDF could not be produced; the primary document is still available.
    fn on_conversion_failed(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::GeneratorConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;
