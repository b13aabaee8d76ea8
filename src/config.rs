//! Configuration types for contract generation.
//!
//! All generation behaviour is controlled through [`GeneratorConfig`], built
//! via its [`GeneratorConfigBuilder`]. Template resolution happens once, in
//! [`GeneratorConfigBuilder::build`]; the pipeline only ever reads the
//! resolved path.

use crate::boilerplate::Boilerplate;
use crate::error::LeaseGenError;
use crate::pipeline::normalize::CurrencyFormat;
use crate::progress::ProgressCallback;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for contract generation.
///
/// Built via [`GeneratorConfig::builder()`] or using
/// [`GeneratorConfig::default()`].
///
/// # Example
/// ```rust
/// use leasegen::GeneratorConfig;
/// use std::time::Duration;
///
/// let config = GeneratorConfig::builder()
///     .template_path("contract_template.docx")
///     .convert_timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GeneratorConfig {
    /// Template file (`.docx` or `.txt`). Default: `contract_template.txt`.
    ///
    /// When the configured path ends in `.txt` and a `.docx` sibling exists,
    /// `build()` switches to the `.docx`.
    pub template_path: PathBuf,

    /// Produce a PDF next to the document. Default: true.
    pub convert_to_pdf: bool,

    /// Converter executable. Default: `libreoffice`.
    pub converter_program: String,

    /// Arguments placed before the conversion flags, e.g.
    /// `["run", "org.libreoffice.LibreOffice"]` for `flatpak`.
    pub converter_args: Vec<String>,

    /// Upper bound on one conversion. Default: 60 s.
    pub convert_timeout: Duration,

    /// Monetary formatting. Default: `AOA 1.234,56`.
    pub currency: CurrencyFormat,

    /// `chrono` format for document issue/expiry dates. Default: `%d/%m/%Y`.
    pub date_format: String,

    /// Prefix of output file names. Default: `CAU_`.
    pub filename_prefix: String,

    /// Static clauses filled into every contract.
    pub boilerplate: Boilerplate,

    /// Receives stage events while a contract is generated.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("contract_template.txt"),
            convert_to_pdf: true,
            converter_program: "libreoffice".to_string(),
            converter_args: Vec::new(),
            convert_timeout: Duration::from_secs(60),
            currency: CurrencyFormat::default(),
            date_format: "%d/%m/%Y".to_string(),
            filename_prefix: "CAU_".to_string(),
            boilerplate: Boilerplate::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("template_path", &self.template_path)
            .field("convert_to_pdf", &self.convert_to_pdf)
            .field("converter_program", &self.converter_program)
            .field("converter_args", &self.converter_args)
            .field("convert_timeout", &self.convert_timeout)
            .field("currency", &self.currency)
            .field("date_format", &self.date_format)
            .field("filename_prefix", &self.filename_prefix)
            .field("boilerplate", &self.boilerplate)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn GenerationProgressCallback>"),
            )
            .finish()
    }
}

impl GeneratorConfig {
    /// Create a new builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder {
            config: Self::default(),
        }
    }

    /// Fail early when the template file is missing.
    pub fn check_template(&self) -> Result<(), LeaseGenError> {
        if self.template_path.is_file() {
            Ok(())
        } else {
            Err(LeaseGenError::TemplateNotFound {
                path: self.template_path.clone(),
            })
        }
    }
}

/// Prefer a `.docx` sibling over a configured `.txt` template.
pub fn resolve_template_path(path: &Path) -> PathBuf {
    let is_txt = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if is_txt {
        let docx = path.with_extension("docx");
        if docx.is_file() {
            return docx;
        }
    }
    path.to_path_buf()
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = path.into();
        self
    }

    pub fn convert_to_pdf(mut self, v: bool) -> Self {
        self.config.convert_to_pdf = v;
        self
    }

    pub fn converter_program(mut self, program: impl Into<String>) -> Self {
        self.config.converter_program = program.into();
        self
    }

    pub fn converter_args(mut self, args: Vec<String>) -> Self {
        self.config.converter_args = args;
        self
    }

    pub fn convert_timeout(mut self, timeout: Duration) -> Self {
        self.config.convert_timeout = timeout;
        self
    }

    pub fn convert_timeout_secs(mut self, secs: u64) -> Self {
        self.config.convert_timeout = Duration::from_secs(secs);
        self
    }

    pub fn currency(mut self, currency: CurrencyFormat) -> Self {
        self.config.currency = currency;
        self
    }

    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.config.date_format = format.into();
        self
    }

    pub fn filename_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.filename_prefix = prefix.into();
        self
    }

    pub fn boilerplate(mut self, boilerplate: Boilerplate) -> Self {
        self.config.boilerplate = boilerplate;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints and resolving the
    /// template path.
    pub fn build(mut self) -> Result<GeneratorConfig, LeaseGenError> {
        let c = &self.config;
        if c.convert_timeout.is_zero() {
            return Err(LeaseGenError::InvalidConfig(
                "Conversion timeout must be greater than zero".into(),
            ));
        }
        if c.converter_program.trim().is_empty() {
            return Err(LeaseGenError::InvalidConfig(
                "Converter program must not be empty".into(),
            ));
        }
        if c.currency.decimals > 6 {
            return Err(LeaseGenError::InvalidConfig(format!(
                "Currency decimals must be 0–6, got {}",
                c.currency.decimals
            )));
        }
        if c.filename_prefix.contains(['/', '\\']) {
            return Err(LeaseGenError::InvalidConfig(format!(
                "Filename prefix must not contain path separators, got '{}'",
                c.filename_prefix
            )));
        }
        check_date_format(&c.date_format)?;

        self.config.template_path = resolve_template_path(&self.config.template_path);
        Ok(self.config)
    }
}

/// chrono reports a bad format string only when formatting, so try one.
fn check_date_format(format: &str) -> Result<(), LeaseGenError> {
    let invalid = || LeaseGenError::InvalidConfig(format!("Invalid date format '{format}'"));
    if format.trim().is_empty() {
        return Err(invalid());
    }
    let probe = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).ok_or_else(invalid)?;
    let mut out = String::new();
    write!(out, "{}", probe.format(format)).map_err(|_| invalid())
}
