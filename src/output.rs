//! Result types for a contract generation.

use crate::error::{ConversionError, LeaseGenError};
use crate::pipeline::context::RenderContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// MIME type of rendered DOCX documents.
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// MIME type of rendered plain-text documents.
pub const TEXT_MIME: &str = "text/plain; charset=utf-8";
/// MIME type of converted documents.
pub const PDF_MIME: &str = "application/pdf";

/// A file produced for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Download name, e.g. `CAU_Pedro Miguel.docx`.
    pub file_name: String,
    pub mime_type: String,
    /// Location inside the generation's working directory.
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl Artifact {
    /// Read the artifact's bytes.
    pub async fn read(&self) -> Result<Vec<u8>, LeaseGenError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| LeaseGenError::Internal(format!("read {}: {e}", self.path.display())))
    }
}

/// Timing of one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub render_duration_ms: u64,
    /// Zero when conversion was disabled.
    pub convert_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything one submission produced.
///
/// Artifacts live in a temporary working directory owned by this value and
/// are deleted when it is dropped. Copy them out first with
/// [`GeneratedContract::save_to`] or read them with [`Artifact::read`].
#[derive(Debug)]
pub struct GeneratedContract {
    /// The rendered document. Always present.
    pub primary: Artifact,
    /// The PDF, when conversion was enabled and succeeded.
    pub secondary: Option<Artifact>,
    /// Why no PDF was produced, when conversion was attempted and failed.
    pub conversion_error: Option<ConversionError>,
    /// The context the template was rendered with.
    pub context: RenderContext,
    pub stats: GenerationStats,
    pub(crate) work_dir: TempDir,
}

impl GeneratedContract {
    /// The scoped working directory holding the artifacts.
    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Copy every artifact into `dir` (created if needed).
    ///
    /// Each file is written to a temporary name and renamed, so `dir` never
    /// holds a partial artifact.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<GenerationSummary, LeaseGenError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| LeaseGenError::OutputWriteFailed {
                path: dir.to_path_buf(),
                source: e,
            })?;

        let primary = save_artifact(&self.primary, dir).await?;
        let secondary = match &self.secondary {
            Some(artifact) => Some(save_artifact(artifact, dir).await?),
            None => None,
        };

        Ok(GenerationSummary {
            primary,
            secondary,
            conversion_warning: self.conversion_error.as_ref().map(|e| e.to_string()),
            stats: self.stats.clone(),
        })
    }
}

async fn save_artifact(artifact: &Artifact, dir: &Path) -> Result<PathBuf, LeaseGenError> {
    let dest = dir.join(&artifact.file_name);
    let tmp = dir.join(format!(".{}.tmp", artifact.file_name));
    let write_err = |e| LeaseGenError::OutputWriteFailed {
        path: dest.clone(),
        source: e,
    };

    let moved = match tokio::fs::copy(&artifact.path, &tmp).await {
        Ok(_) => tokio::fs::rename(&tmp, &dest).await,
        Err(e) => Err(e),
    };
    if let Err(e) = moved {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(write_err(e));
    }
    Ok(dest)
}

/// Where a generation's artifacts were saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub primary: PathBuf,
    pub secondary: Option<PathBuf>,
    /// Set when the PDF could not be produced.
    pub conversion_warning: Option<String>,
    pub stats: GenerationStats,
}
