//! PDF conversion through an external office suite.
//!
//! The converter is a black box: `<program> --headless --convert-to pdf
//! --outdir <dir> <document>`. Success means exit status 0 *and* the expected
//! `<dir>/<stem>.pdf` on disk; LibreOffice exits 0 for some failed
//! conversions.
//!
//! ## Timeout
//!
//! A stuck office process must not hang the submission. The child is spawned
//! with `kill_on_drop`, so when [`tokio::time::timeout`] expires and drops the
//! wait future, the process is killed as well.

use crate::config::GeneratorConfig;
use crate::error::ConversionError;
use crate::output::{Artifact, PDF_MIME};
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tracing::debug;

/// Longest stderr excerpt kept in [`ConversionError::ProcessFailed`].
const MAX_STDERR_CHARS: usize = 500;

/// Convert `document` to PDF inside `out_dir`.
pub async fn convert_to_pdf(
    document: &Path,
    out_dir: &Path,
    config: &GeneratorConfig,
) -> Result<Artifact, ConversionError> {
    let program = config.converter_program.as_str();
    let mut cmd = Command::new(program);
    cmd.args(&config.converter_args)
        .arg("--headless")
        .arg("--convert-to")
        .arg("pdf")
        .arg("--outdir")
        .arg(out_dir)
        .arg(document)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    debug!("Running converter: {:?}", cmd.as_std());
    let start = Instant::now();

    let child = cmd.spawn().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConversionError::ConverterNotFound {
                program: program.to_string(),
            }
        } else {
            ConversionError::SpawnFailed {
                program: program.to_string(),
                detail: e.to_string(),
            }
        }
    })?;

    let output = match tokio::time::timeout(config.convert_timeout, child.wait_with_output()).await
    {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ConversionError::SpawnFailed {
                program: program.to_string(),
                detail: e.to_string(),
            })
        }
        Err(_) => {
            return Err(ConversionError::Timeout {
                elapsed_ms: start.elapsed().as_millis() as u64,
            })
        }
    };
    debug!(
        "Converter exited with {:?} after {}ms",
        output.status.code(),
        start.elapsed().as_millis()
    );

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConversionError::ProcessFailed {
            code: output.status.code(),
            stderr: stderr.trim().chars().take(MAX_STDERR_CHARS).collect(),
        });
    }

    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{stem}.pdf");
    let pdf_path = out_dir.join(&file_name);

    match tokio::fs::metadata(&pdf_path).await {
        Ok(meta) if meta.is_file() => Ok(Artifact {
            file_name,
            mime_type: PDF_MIME.to_string(),
            path: pdf_path,
            size_bytes: meta.len(),
        }),
        _ => Err(ConversionError::MissingOutput { path: pdf_path }),
    }
}
