//! CLI binary for leasegen.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `GeneratorConfig` and prints results.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use leasegen::{
    audit_template, generate, load_input, validate, GenerationProgressCallback, GeneratorConfig,
    LeaseGenError, ProgressCallback, ValidationErrors, DEFAULT_TEMPLATE, PLACEHOLDER_KEYS,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit status for data that fails validation.
const EXIT_INVALID_DATA: u8 = 2;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner that names the stage currently running.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Validating");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl GenerationProgressCallback for CliProgressCallback {
    fn on_validation_failed(&self, _error_count: usize) {
        self.bar.finish_and_clear();
    }

    fn on_render_start(&self, template: &str) {
        self.bar.set_prefix("Rendering");
        self.bar.set_message(template.to_string());
    }

    fn on_render_complete(&self, file_name: &str, size_bytes: u64) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            file_name,
            dim(&format!("{size_bytes} bytes"))
        ));
    }

    fn on_conversion_start(&self, program: &str) {
        self.bar.set_prefix("Converting");
        self.bar.set_message(format!("PDF via {program}"));
    }

    fn on_conversion_complete(&self, file_name: &str) {
        self.bar.println(format!("  {} {}", green("✓"), file_name));
    }

    fn on_conversion_failed(&self, error: &str) {
        self.bar
            .println(format!("  {} PDF not produced: {}", yellow("⚠"), error));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate the contract and its PDF into ./out
  leasegen generate contract.json -o out

  # Read the data from stdin, document only
  cat contract.json | leasegen generate - --no-pdf

  # Use LibreOffice through flatpak
  leasegen generate contract.json --converter flatpak \
      --converter-arg run --converter-arg org.libreoffice.LibreOffice

  # Only validate the data
  leasegen check contract.json

  # Compare a template with the known placeholders
  leasegen placeholders --template contract_template.docx

  # Start from the built-in template
  leasegen init-template -o contract_template.txt

ENVIRONMENT VARIABLES:
  LEASEGEN_TEMPLATE         Template path (.txt or .docx)
  LEASEGEN_OUTPUT_DIR       Output directory for generated files
  LEASEGEN_CONVERTER        Converter program (default: libreoffice)
  LEASEGEN_CONVERT_TIMEOUT  Conversion timeout in seconds
  LEASEGEN_NO_PDF           Skip PDF conversion
  RUST_LOG                  Overrides --verbose / --quiet log filtering

EXIT STATUS:
  0  success (a failed PDF conversion is only a warning)
  1  rendering, template or I/O error
  2  the contract data failed validation
"#;

/// Generate urban lease contracts from JSON data and a template.
#[derive(Parser, Debug)]
#[command(
    name = "leasegen",
    version,
    about = "Generate urban lease contracts from JSON data and a template",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "LEASEGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "LEASEGEN_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, global = true, env = "LEASEGEN_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the contract (and PDF) for one submission.
    Generate(GenerateArgs),
    /// Validate contract data without rendering anything.
    Check {
        /// JSON file with the contract data, or `-` for stdin.
        input: String,
        /// Print the errors as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the placeholder keys, optionally auditing a template.
    Placeholders {
        /// Template to compare against the known keys.
        #[arg(long, env = "LEASEGEN_TEMPLATE")]
        template: Option<PathBuf>,
    },
    /// Write the built-in plain-text template to disk.
    InitTemplate {
        #[arg(short, long, default_value = "contract_template.txt")]
        output: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON file with the contract data, or `-` for stdin.
    input: String,

    /// Directory receiving the generated files.
    #[arg(short, long, env = "LEASEGEN_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Template file (.txt or .docx). A .docx next to a .txt wins.
    #[arg(long, env = "LEASEGEN_TEMPLATE", default_value = "contract_template.txt")]
    template: PathBuf,

    /// Skip the PDF conversion.
    #[arg(long, env = "LEASEGEN_NO_PDF")]
    no_pdf: bool,

    /// Converter program.
    #[arg(long, env = "LEASEGEN_CONVERTER", default_value = "libreoffice")]
    converter: String,

    /// Argument placed before the conversion flags (repeatable).
    #[arg(long = "converter-arg", allow_hyphen_values = true)]
    converter_args: Vec<String>,

    /// Conversion timeout in seconds.
    #[arg(long, env = "LEASEGEN_CONVERT_TIMEOUT", default_value_t = 60)]
    convert_timeout: u64,

    /// Prefix of the generated file names.
    #[arg(long, env = "LEASEGEN_FILENAME_PREFIX", default_value = "CAU_")]
    prefix: String,

    /// Output a JSON summary instead of text.
    #[arg(long, env = "LEASEGEN_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner covers INFO-level feedback, so library logs drop to errors
    // while it is shown.
    let json = matches!(
        &cli.command,
        Command::Generate(GenerateArgs { json: true, .. }) | Command::Check { json: true, .. }
    );
    let show_progress = !cli.quiet && !cli.no_progress && !json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Generate(ref args) => run_generate(args, &cli, show_progress).await,
        Command::Check { ref input, json } => run_check(input, json).await,
        Command::Placeholders { ref template } => run_placeholders(template.as_ref()),
        Command::InitTemplate { ref output, force } => run_init_template(output, force, cli.quiet),
    }
}

async fn run_generate(args: &GenerateArgs, cli: &Cli, show_progress: bool) -> Result<ExitCode> {
    let progress = show_progress.then(CliProgressCallback::new);

    let mut builder = GeneratorConfig::builder()
        .template_path(&args.template)
        .convert_to_pdf(!args.no_pdf)
        .converter_program(&args.converter)
        .converter_args(args.converter_args.clone())
        .convert_timeout_secs(args.convert_timeout)
        .filename_prefix(&args.prefix);
    if let Some(ref cb) = progress {
        builder = builder.progress_callback(cb.clone() as ProgressCallback);
    }
    let config = builder.build().context("Invalid configuration")?;
    config.check_template().context("Template check failed")?;

    let input = load_input(&args.input)
        .await
        .context("Failed to load contract data")?;

    let result = generate(&input, &config).await;
    if let Some(ref cb) = progress {
        cb.finish();
    }
    let contract = match result {
        Ok(c) => c,
        Err(LeaseGenError::Validation(errors)) => {
            report_validation(&errors, args.json)?;
            return Ok(ExitCode::from(EXIT_INVALID_DATA));
        }
        Err(e) => return Err(e).context("Contract generation failed"),
    };

    let summary = contract
        .save_to(&args.output_dir)
        .await
        .context("Failed to save generated files")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(ref warning) = summary.conversion_warning {
        eprintln!(
            "{} PDF conversion failed: {}\n   {}",
            yellow("⚠"),
            warning,
            dim("LibreOffice must be installed to produce the PDF; the document was still generated.")
        );
    }
    if !cli.quiet {
        eprintln!(
            "{}  {}ms  →  {}",
            green("✔"),
            summary.stats.total_duration_ms,
            bold(&summary.primary.display().to_string())
        );
        if let Some(ref pdf) = summary.secondary {
            eprintln!("             →  {}", bold(&pdf.display().to_string()));
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_check(input: &str, json: bool) -> Result<ExitCode> {
    let input = load_input(input)
        .await
        .context("Failed to load contract data")?;
    match validate(&input) {
        Ok(()) => {
            if json {
                println!("[]");
            } else {
                eprintln!("{} Contract data is valid", green("✔"));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(errors) => {
            report_validation(&errors, json)?;
            Ok(ExitCode::from(EXIT_INVALID_DATA))
        }
    }
}

fn report_validation(errors: &ValidationErrors, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(errors).context("Failed to serialise errors")?
        );
    } else {
        eprintln!(
            "{} {}\n{}",
            red("✘"),
            bold("Foram encontrados erros nos dados do contrato:"),
            errors
        );
    }
    Ok(())
}

fn run_placeholders(template: Option<&PathBuf>) -> Result<ExitCode> {
    let Some(path) = template else {
        for key in PLACEHOLDER_KEYS {
            println!("{key}");
        }
        return Ok(ExitCode::SUCCESS);
    };

    let audit = audit_template(path)
        .with_context(|| format!("Failed to read template {}", path.display()))?;
    for key in &audit.unknown {
        println!("{} {}  {}", red("✗"), key, dim("unknown, rendering will fail"));
    }
    for key in &audit.unused {
        println!("{} {}  {}", dim("·"), key, dim("not used by the template"));
    }
    if audit.is_renderable() {
        eprintln!("{} {} can be rendered", green("✔"), path.display());
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{} {} uses {} unknown placeholder(s)",
            red("✘"),
            path.display(),
            audit.unknown.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn run_init_template(output: &PathBuf, force: bool, quiet: bool) -> Result<ExitCode> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }
    std::fs::write(output, DEFAULT_TEMPLATE)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if !quiet {
        eprintln!("{} Wrote {}", green("✔"), bold(&output.display().to_string()));
    }
    Ok(ExitCode::SUCCESS)
}
