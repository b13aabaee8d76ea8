//! Document rendering: load the template, substitute placeholders, write the
//! primary artifact.
//!
//! ## Why spawn_blocking?
//!
//! DOCX templates are ZIP packages: every entry is inflated, the
//! WordprocessingML parts are rewritten and the package is deflated again.
//! That is synchronous, CPU-bound work, so it runs on tokio's blocking pool
//! instead of stalling a worker thread.
//!
//! Only `word/document.xml` and the header/footer parts can hold
//! placeholders; every other entry is copied raw without recompression.

use crate::error::LeaseGenError;
use crate::output::{Artifact, DOCX_MIME, TEXT_MIME};
use crate::pipeline::context::RenderContext;
use crate::pipeline::template::{self, Escape};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Template flavours, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// UTF-8 text with `{{ name }}` placeholders.
    Text,
    /// Word document with `{{ name }}` placeholders in its body, headers or footers.
    Docx,
}

impl TemplateKind {
    /// Detect the kind from `path`'s extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LeaseGenError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("txt") => Ok(TemplateKind::Text),
            Some("docx") => Ok(TemplateKind::Docx),
            _ => Err(LeaseGenError::UnsupportedTemplate {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Extension of documents rendered from this kind.
    pub fn extension(self) -> &'static str {
        match self {
            TemplateKind::Text => "txt",
            TemplateKind::Docx => "docx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            TemplateKind::Text => TEXT_MIME,
            TemplateKind::Docx => DOCX_MIME,
        }
    }
}

/// Render `template_path` with `context` into `out_dir/<base_name>.<ext>`.
pub async fn render_document(
    template_path: &Path,
    context: &RenderContext,
    out_dir: &Path,
    base_name: &str,
) -> Result<Artifact, LeaseGenError> {
    let kind = TemplateKind::from_path(template_path)?;
    let template = template_path.to_path_buf();
    let file_name = format!("{base_name}.{}", kind.extension());
    let output = out_dir.join(&file_name);
    let ctx = context.clone();

    let out = output.clone();
    let rendered = tokio::task::spawn_blocking(move || match kind {
        TemplateKind::Text => render_text_blocking(&template, &ctx, &out),
        TemplateKind::Docx => render_docx_blocking(&template, &ctx, &out),
    })
    .await
    .map_err(|e| LeaseGenError::Internal(format!("Render task panicked: {}", e)))?;

    if let Err(e) = rendered {
        // A DOCX package is streamed, so a failure can leave half a file.
        let _ = tokio::fs::remove_file(&output).await;
        return Err(e);
    }

    let size_bytes = tokio::fs::metadata(&output)
        .await
        .map_err(|e| LeaseGenError::OutputWriteFailed {
            path: output.clone(),
            source: e,
        })?
        .len();
    info!("Rendered {} ({} bytes)", file_name, size_bytes);

    Ok(Artifact {
        file_name,
        mime_type: kind.mime_type().to_string(),
        path: output,
        size_bytes,
    })
}

/// Placeholder names used anywhere in the template at `path`.
pub fn template_placeholders(path: &Path) -> Result<BTreeSet<String>, LeaseGenError> {
    let render_err = |source| LeaseGenError::Render {
        path: path.to_path_buf(),
        source,
    };

    match TemplateKind::from_path(path)? {
        TemplateKind::Text => template::placeholders(&read_text(path)?).map_err(render_err),
        TemplateKind::Docx => {
            let mut archive = open_archive(path)?;
            let mut names = BTreeSet::new();
            for i in 0..archive.len() {
                let mut entry = archive.by_index(i).map_err(|e| unreadable(path, e))?;
                if !holds_placeholders(entry.name()) {
                    continue;
                }
                let mut xml = String::new();
                entry
                    .read_to_string(&mut xml)
                    .map_err(|e| unreadable(path, e))?;
                names.extend(template::placeholders(&xml).map_err(render_err)?);
            }
            Ok(names)
        }
    }
}

// ── Text ─────────────────────────────────────────────────────────────────

fn render_text_blocking(
    template: &Path,
    context: &RenderContext,
    output: &Path,
) -> Result<(), LeaseGenError> {
    let source = read_text(template)?;
    let rendered =
        template::substitute(&source, context, Escape::None).map_err(|source| {
            LeaseGenError::Render {
                path: template.to_path_buf(),
                source,
            }
        })?;
    std::fs::write(output, rendered).map_err(|e| LeaseGenError::OutputWriteFailed {
        path: output.to_path_buf(),
        source: e,
    })
}

fn read_text(path: &Path) -> Result<String, LeaseGenError> {
    match std::fs::read_to_string(path) {
        Ok(s) => Ok(s),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LeaseGenError::TemplateNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(unreadable(path, e)),
    }
}

// ── DOCX ─────────────────────────────────────────────────────────────────

/// WordprocessingML parts that may contain placeholders.
fn holds_placeholders(entry: &str) -> bool {
    const PARTS: [&str; 3] = ["word/document.xml", "word/footnotes.xml", "word/endnotes.xml"];
    PARTS.contains(&entry)
        || ((entry.starts_with("word/header") || entry.starts_with("word/footer"))
            && entry.ends_with(".xml"))
}

fn render_docx_blocking(
    template: &Path,
    context: &RenderContext,
    output: &Path,
) -> Result<(), LeaseGenError> {
    let mut archive = open_archive(template)?;

    let file = File::create(output).map_err(|e| write_failed(output, e))?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| unreadable(template, e))?;
        let name = entry.name().to_string();

        if !holds_placeholders(&name) {
            writer
                .raw_copy_file(entry)
                .map_err(|e| write_failed(output, e))?;
            continue;
        }

        let mut xml = String::new();
        entry
            .read_to_string(&mut xml)
            .map_err(|e| unreadable(template, e))?;
        let rendered =
            template::substitute(&xml, context, Escape::Xml).map_err(|source| {
                LeaseGenError::Render {
                    path: template.to_path_buf(),
                    source,
                }
            })?;
        debug!("Substituted placeholders in {}", name);

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| write_failed(output, e))?;
        writer
            .write_all(rendered.as_bytes())
            .map_err(|e| write_failed(output, e))?;
    }

    let mut inner = writer.finish().map_err(|e| write_failed(output, e))?;
    inner.flush().map_err(|e| write_failed(output, e))
}

fn open_archive(path: &Path) -> Result<ZipArchive<BufReader<File>>, LeaseGenError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LeaseGenError::TemplateNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(unreadable(path, e)),
    };
    ZipArchive::new(BufReader::new(file)).map_err(|e| unreadable(path, e))
}

fn unreadable(path: &Path, e: impl std::fmt::Display) -> LeaseGenError {
    LeaseGenError::TemplateUnreadable {
        path: path.to_path_buf(),
        detail: e.to_string(),
    }
}

fn write_failed(path: &Path, e: impl Into<std::io::Error>) -> LeaseGenError {
    LeaseGenError::OutputWriteFailed {
        path: PathBuf::from(path),
        source: e.into(),
    }
}
