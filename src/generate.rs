//! Contract generation entry points.
//!
//! [`generate`] runs one submission end to end and hands back a
//! [`GeneratedContract`] whose artifacts live in a scoped temporary directory.
//! [`generate_to_dir`] is the convenience form that also saves them.

use crate::config::GeneratorConfig;
use crate::contract::ContractInput;
use crate::error::LeaseGenError;
use crate::output::{GeneratedContract, GenerationStats, GenerationSummary};
use crate::pipeline::context::{build_context, PLACEHOLDER_KEYS};
use crate::pipeline::{convert, normalize, render, validate};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Used when the tenant name has no usable characters.
const FALLBACK_FILE_STEM: &str = "inquilino";

/// Generate the contract document (and PDF, if enabled) for one submission.
///
/// # Errors
/// - [`LeaseGenError::Validation`]: the data breaks one or more rules.
///   Returned before any file is touched.
/// - template, normalisation and I/O variants: rendering failed and no
///   artifact is produced.
///
/// A failed PDF conversion is *not* an error: the result has
/// `secondary == None` and `conversion_error` set.
pub async fn generate(
    input: &ContractInput,
    config: &GeneratorConfig,
) -> Result<GeneratedContract, LeaseGenError> {
    let today = chrono::Local::now().date_naive();
    generate_as_of(input, config, today).await
}

/// [`generate`] with an explicit date for contracts without a signing date.
pub async fn generate_as_of(
    input: &ContractInput,
    config: &GeneratorConfig,
    today: NaiveDate,
) -> Result<GeneratedContract, LeaseGenError> {
    let total_start = Instant::now();
    info!("Generating contract for '{}'", input.tenant_name.trim());

    // ── Step 1: Validate ─────────────────────────────────────────────────
    if let Err(errors) = validate::validate(input) {
        info!("Validation failed with {} error(s)", errors.len());
        if let Some(ref cb) = config.progress_callback {
            cb.on_validation_failed(errors.len());
        }
        return Err(LeaseGenError::Validation(errors));
    }

    // ── Step 2: Normalise and build the context ──────────────────────────
    let normalized = normalize::normalize(input, config, today)?;
    let context = build_context(&normalized, &config.boilerplate);
    debug!("Render context has {} keys", context.len());

    // ── Step 3: Render into a scoped working directory ───────────────────
    let work_dir =
        tempfile::TempDir::new().map_err(|e| LeaseGenError::Internal(format!("tempdir: {e}")))?;
    let base_name = base_file_name(&config.filename_prefix, &normalized.tenant_name);

    if let Some(ref cb) = config.progress_callback {
        cb.on_render_start(&config.template_path.display().to_string());
    }
    let render_start = Instant::now();
    let primary =
        render::render_document(&config.template_path, &context, work_dir.path(), &base_name)
            .await
            .inspect_err(|e| error!("Failed to render contract: {}", e))?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    if let Some(ref cb) = config.progress_callback {
        cb.on_render_complete(&primary.file_name, primary.size_bytes);
    }

    // ── Step 4: Convert (best effort) ────────────────────────────────────
    let mut secondary = None;
    let mut conversion_error = None;
    let mut convert_duration_ms = 0;
    if config.convert_to_pdf {
        if let Some(ref cb) = config.progress_callback {
            cb.on_conversion_start(&config.converter_program);
        }
        let convert_start = Instant::now();
        match convert::convert_to_pdf(&primary.path, work_dir.path(), config).await {
            Ok(pdf) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_conversion_complete(&pdf.file_name);
                }
                secondary = Some(pdf);
            }
            Err(e) => {
                warn!("PDF conversion failed, document still available: {}", e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_conversion_failed(&e.to_string());
                }
                conversion_error = Some(e);
            }
        }
        convert_duration_ms = convert_start.elapsed().as_millis() as u64;
    }

    let stats = GenerationStats {
        render_duration_ms,
        convert_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };
    info!(
        "Contract generated: {}{} in {}ms",
        primary.file_name,
        secondary
            .as_ref()
            .map(|s| format!(" + {}", s.file_name))
            .unwrap_or_default(),
        stats.total_duration_ms
    );

    Ok(GeneratedContract {
        primary,
        secondary,
        conversion_error,
        context,
        stats,
        work_dir,
    })
}

/// Generate a contract and save its artifacts into `out_dir`.
///
/// The temporary working directory is removed before returning.
pub async fn generate_to_dir(
    input: &ContractInput,
    out_dir: impl AsRef<Path>,
    config: &GeneratorConfig,
) -> Result<GenerationSummary, LeaseGenError> {
    let generated = generate(input, config).await?;
    generated.save_to(out_dir).await
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input: &ContractInput,
    config: &GeneratorConfig,
) -> Result<GeneratedContract, LeaseGenError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| LeaseGenError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(input, config))
}

/// `<prefix><tenant>` keeping only alphanumerics, space, `-` and `_`.
pub fn base_file_name(prefix: &str, tenant_name: &str) -> String {
    let safe: String = tenant_name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let safe = safe.trim();
    format!(
        "{prefix}{}",
        if safe.is_empty() { FALLBACK_FILE_STEM } else { safe }
    )
}

/// How a template's placeholders line up with the render context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateAudit {
    /// Used by the template but never provided; rendering will fail.
    pub unknown: Vec<String>,
    /// Provided but not used by the template; harmless.
    pub unused: Vec<String>,
}

impl TemplateAudit {
    /// Whether the template can be rendered.
    pub fn is_renderable(&self) -> bool {
        self.unknown.is_empty()
    }
}

/// Compare the placeholders in `template_path` with [`PLACEHOLDER_KEYS`].
pub fn audit_template(template_path: &Path) -> Result<TemplateAudit, LeaseGenError> {
    let used = render::template_placeholders(template_path)?;
    let known: BTreeSet<String> = PLACEHOLDER_KEYS.iter().map(|k| k.to_string()).collect();
    Ok(TemplateAudit {
        unknown: used.difference(&known).cloned().collect(),
        unused: known.difference(&used).cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_sanitised() {
        assert_eq!(base_file_name("CAU_", "Pedro Miguel"), "CAU_Pedro Miguel");
        assert_eq!(base_file_name("CAU_", " João/../Silva* "), "CAU_JoãoSilva");
        assert_eq!(base_file_name("CAU_", "Ana-Maria_2"), "CAU_Ana-Maria_2");
        assert_eq!(base_file_name("CAU_", "***"), "CAU_inquilino");
        assert_eq!(base_file_name("", ""), "inquilino");
    }
}
