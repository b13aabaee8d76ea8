//! End-to-end integration tests for leasegen.
//!
//! Every test renders into a temporary directory and never needs a real
//! office suite: conversion is either disabled, pointed at a program that
//! does not exist, or (unix only) handled by a small shell script.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use chrono::NaiveDate;
use leasegen::{
    audit_template, generate, generate_as_of, generate_sync, generate_to_dir, ContractInput,
    DocumentType, GenerationProgressCallback, GeneratorConfig, LeaseGenError, TemplateError,
    DEFAULT_TEMPLATE, PLACEHOLDER_KEYS,
};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

fn valid_input() -> ContractInput {
    ContractInput {
        landlord_name: Some("Imobiliária Kianda, Lda".into()),
        landlord_tax_id: Some("5417000000".into()),
        landlord_address: Some("Rua Rainha Ginga 12".into()),
        representative_name: Some("António Neto".into()),
        tenant_name: "Pedro Miguel".into(),
        tenant_tax_id: "004567890LA042".into(),
        tenant_contact: Some("+244 923 000 000".into()),
        tenant_email: Some("pedro@example.ao".into()),
        document_type: DocumentType::BilheteDeIdentidade,
        document_number: "004567890LA042".into(),
        document_issue_date: NaiveDate::from_ymd_opt(2020, 1, 1),
        document_expiry_date: NaiveDate::from_ymd_opt(2030, 1, 1),
        property_address: "Apartamento 3B, Rua Imóvel 99".into(),
        start_date_written: "1 de Novembro de 2025".into(),
        end_date_written: Some("31 de Outubro de 2026".into()),
        rent_amount: 150_000.0,
        payment_method: Some("transferência bancária".into()),
        deposit_amount: 300_000.0,
        condominium_fee: 0.0,
        bank_name: "Banco BAI".into(),
        iban: "AO06 0005 0000 1234 5678 9019 4".into(),
        signing_location: "Luanda".into(),
        signing_date: NaiveDate::from_ymd_opt(2025, 10, 25),
    }
}

fn write_default_template(dir: &Path) -> PathBuf {
    let path = dir.join("contract_template.txt");
    std::fs::write(&path, DEFAULT_TEMPLATE).unwrap();
    path
}

fn document_only(template: &Path) -> GeneratorConfig {
    GeneratorConfig::builder()
        .template_path(template)
        .convert_to_pdf(false)
        .build()
        .unwrap()
}

#[derive(Default)]
struct Counter {
    validation_failures: AtomicUsize,
    renders: AtomicUsize,
    conversion_failures: AtomicUsize,
}

impl GenerationProgressCallback for Counter {
    fn on_validation_failed(&self, _error_count: usize) {
        self.validation_failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_render_start(&self, _template: &str) {
        self.renders.fetch_add(1, Ordering::SeqCst);
    }

    fn on_conversion_failed(&self, _error: &str) {
        self.conversion_failures.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Generation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn default_template_renders_complete_contract() {
    let dir = TempDir::new().unwrap();
    let config = document_only(&write_default_template(dir.path()));

    let contract = generate(&valid_input(), &config).await.unwrap();

    let keys: BTreeSet<&str> = contract.context.keys().map(String::as_str).collect();
    assert_eq!(keys, PLACEHOLDER_KEYS.into_iter().collect::<BTreeSet<_>>());

    assert_eq!(contract.primary.file_name, "CAU_Pedro Miguel.txt");
    assert!(contract.primary.size_bytes > 0);
    assert!(contract.secondary.is_none());
    assert!(contract.conversion_error.is_none());

    let text = String::from_utf8(contract.primary.read().await.unwrap()).unwrap();
    assert!(!text.contains("{{"), "unrendered placeholder left in output");
    assert!(text.contains("AOA 150.000,00"));
    assert!(text.contains("AOA 300.000,00"));
    assert!(text.contains("Taxa de condomínio: AOA 0,00."));
    assert!(text.contains("Luanda, aos 25 de Outubro de 2025"));
    assert!(text.contains("Bilhete de Identidade 004567890LA042"));
    assert!(text.contains("emitido em 01/01/2020"));
}

#[test]
fn blocking_wrapper_generates_without_a_runtime() {
    let dir = TempDir::new().unwrap();
    let config = document_only(&write_default_template(dir.path()));

    let contract = generate_sync(&valid_input(), &config).unwrap();
    assert_eq!(contract.primary.file_name, "CAU_Pedro Miguel.txt");
    let text = std::fs::read_to_string(&contract.primary.path).unwrap();
    assert!(text.contains("Pedro Miguel"));
    assert!(contract.secondary.is_none());
}

#[tokio::test]
async fn missing_signing_date_uses_generation_day() {
    let dir = TempDir::new().unwrap();
    let config = document_only(&write_default_template(dir.path()));
    let input = ContractInput {
        signing_date: None,
        ..valid_input()
    };
    let today = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();

    let contract = generate_as_of(&input, &config, today).await.unwrap();
    assert_eq!(
        contract.context["contract_date_local"],
        "Luanda, aos 9 de Março de 2026"
    );
}

#[tokio::test]
async fn absent_converter_keeps_primary_document() {
    let dir = TempDir::new().unwrap();
    let counter = Arc::new(Counter::default());
    let config = GeneratorConfig::builder()
        .template_path(write_default_template(dir.path()))
        .converter_program("leasegen-no-such-converter")
        .progress_callback(counter.clone())
        .build()
        .unwrap();

    let contract = generate(&valid_input(), &config).await.unwrap();
    assert!(contract.primary.path.is_file());
    assert!(contract.secondary.is_none());
    assert!(contract.conversion_error.is_some());
    assert_eq!(counter.conversion_failures.load(Ordering::SeqCst), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn slow_converter_times_out_without_losing_document() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("slow.sh");
    std::fs::write(&script, "sleep 10").unwrap();
    let config = GeneratorConfig::builder()
        .template_path(write_default_template(dir.path()))
        .converter_program("sh")
        .converter_args(vec![script.to_string_lossy().into_owned()])
        .convert_timeout(Duration::from_millis(300))
        .build()
        .unwrap();

    let contract = generate(&valid_input(), &config).await.unwrap();
    assert!(contract.primary.size_bytes > 0);
    assert!(contract.secondary.is_none());
    assert!(matches!(
        contract.conversion_error,
        Some(leasegen::ConversionError::Timeout { .. })
    ));
}

#[cfg(unix)]
#[tokio::test]
async fn working_converter_produces_pdf_and_both_are_saved() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("convert.sh");
    std::fs::write(
        &script,
        r#"base=$(basename "$6"); cp "$6" "$5/${base%.*}.pdf""#,
    )
    .unwrap();
    let config = GeneratorConfig::builder()
        .template_path(write_default_template(dir.path()))
        .converter_program("sh")
        .converter_args(vec![script.to_string_lossy().into_owned()])
        .build()
        .unwrap();

    let out = dir.path().join("out");
    let summary = generate_to_dir(&valid_input(), &out, &config).await.unwrap();

    assert_eq!(summary.primary, out.join("CAU_Pedro Miguel.txt"));
    assert_eq!(summary.secondary, Some(out.join("CAU_Pedro Miguel.pdf")));
    assert!(summary.conversion_warning.is_none());
    assert!(summary.primary.is_file());
    assert!(out.join("CAU_Pedro Miguel.pdf").is_file());
    let leftovers: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[tokio::test]
async fn working_directory_is_removed_on_drop() {
    let dir = TempDir::new().unwrap();
    let config = document_only(&write_default_template(dir.path()));

    let contract = generate(&valid_input(), &config).await.unwrap();
    let work_dir = contract.work_dir().to_path_buf();
    assert!(work_dir.is_dir());
    drop(contract);
    assert!(!work_dir.exists());
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn invalid_data_is_rejected_before_rendering() {
    let dir = TempDir::new().unwrap();
    let counter = Arc::new(Counter::default());
    // The template does not exist: validation must fail first.
    let config = GeneratorConfig::builder()
        .template_path(dir.path().join("missing.txt"))
        .convert_to_pdf(false)
        .progress_callback(counter.clone())
        .build()
        .unwrap();

    let err = generate(&ContractInput::default(), &config)
        .await
        .unwrap_err();
    match err {
        LeaseGenError::Validation(errors) => assert_eq!(errors.len(), 11),
        other => panic!("expected validation error, got: {other}"),
    }
    assert_eq!(counter.validation_failures.load(Ordering::SeqCst), 1);
    assert_eq!(counter.renders.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn bad_iban_and_date_order_are_both_reported() {
    let dir = TempDir::new().unwrap();
    let config = document_only(&write_default_template(dir.path()));
    let input = ContractInput {
        iban: "XX1234567890123".into(),
        document_expiry_date: NaiveDate::from_ymd_opt(2019, 1, 1),
        ..valid_input()
    };

    let err = generate(&input, &config).await.unwrap_err();
    let LeaseGenError::Validation(errors) = err else {
        panic!("expected validation error, got: {err}");
    };
    let messages: Vec<_> = errors.messages().collect();
    assert_eq!(messages.len(), 2);
    assert!(messages[0].contains("IBAN"));
    assert!(messages[1].contains("posterior"));
}

#[tokio::test]
async fn unknown_placeholders_fail_rendering() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("t.txt");
    std::fs::write(&template, "{{ inquilino }} {{ fiador }} {{ garantia }}").unwrap();

    let err = generate(&valid_input(), &document_only(&template))
        .await
        .unwrap_err();
    match err {
        LeaseGenError::Render {
            source: TemplateError::MissingPlaceholders(names),
            ..
        } => assert_eq!(names, vec!["fiador".to_string(), "garantia".to_string()]),
        other => panic!("expected render error, got: {other}"),
    }
}

#[tokio::test]
async fn missing_template_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = document_only(&dir.path().join("nowhere.txt"));
    assert!(config.check_template().is_err());

    let err = generate(&valid_input(), &config).await.unwrap_err();
    assert!(
        matches!(err, LeaseGenError::TemplateNotFound { .. }),
        "got: {err}"
    );
}

// ── Template audit ───────────────────────────────────────────────────────────

#[test]
fn default_template_uses_every_key() {
    let dir = TempDir::new().unwrap();
    let audit = audit_template(&write_default_template(dir.path())).unwrap();
    assert!(audit.is_renderable());
    assert!(audit.unused.is_empty(), "unused: {:?}", audit.unused);
}

#[test]
fn audit_lists_unknown_and_unused_keys() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("short.txt");
    std::fs::write(&template, "{{ inquilino }} paga {{ valor_renda }} a {{ fiador }}").unwrap();

    let audit = audit_template(&template).unwrap();
    assert_eq!(audit.unknown, vec!["fiador".to_string()]);
    assert_eq!(audit.unused.len(), PLACEHOLDER_KEYS.len() - 2);
    assert!(!audit.unused.contains(&"inquilino".to_string()));
}
