//! Validation: required fields, IBAN format, money and date rules.
//!
//! Every rule runs regardless of earlier failures so a single pass reports
//! everything the user has to fix. Failures are returned as data
//! ([`ValidationErrors`]); nothing here panics or touches the file system.

use crate::contract::ContractInput;
use serde::Serialize;
use std::fmt;

/// Country prefix every accepted IBAN must start with.
pub const IBAN_COUNTRY_PREFIX: &str = "AO";

/// Minimum IBAN length after removing spaces.
pub const IBAN_MIN_LEN: usize = 15;

/// The contract field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TenantName,
    DocumentNumber,
    TenantTaxId,
    PropertyAddress,
    StartDateWritten,
    BankName,
    SigningLocation,
    Iban,
    RentAmount,
    DepositAmount,
    CondominiumFee,
    DocumentIssueDate,
    DocumentExpiryDate,
}

/// The rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    InvalidIban,
    NotPositive,
    Negative,
    ExpiryNotAfterIssue,
}

/// One violated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: Field,
    pub rule: Rule,
}

impl ValidationError {
    fn new(field: Field, rule: Rule) -> Self {
        Self { field, rule }
    }

    /// Human-readable message shown to the user.
    pub fn message(&self) -> &'static str {
        use Field::*;
        match (self.field, self.rule) {
            (TenantName, _) => "Nome do Inquilino é obrigatório",
            (DocumentNumber, _) => "Número do documento é obrigatório",
            (TenantTaxId, _) => "NIF do inquilino é obrigatório",
            (PropertyAddress, _) => "Endereço do imóvel é obrigatório",
            (StartDateWritten, _) => "Data de início (escrita) é obrigatória",
            (BankName, _) => "Nome do banco é obrigatório",
            (SigningLocation, _) => "Local de assinatura do contrato é obrigatório",
            (Iban, _) => {
                "Por favor introduza um IBAN válido (começando com AO, com pelo menos 15 caracteres)"
            }
            (RentAmount, _) => "Valor da renda deve ser maior que zero",
            (DepositAmount, _) => "Valor da caução inválido",
            (CondominiumFee, _) => "Taxa de condomínio inválida",
            (DocumentIssueDate, _) => "Data de emissão do documento é obrigatória",
            (DocumentExpiryDate, Rule::ExpiryNotAfterIssue) => {
                "A data de validade do documento deve ser posterior à data de emissão"
            }
            (DocumentExpiryDate, _) => "Data de validade do documento é obrigatória",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Ordered, non-empty list of validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages in the order the rules were evaluated.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(ValidationError::message)
    }

    /// Whether any error refers to `field`.
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "  • {e}")?;
        }
        Ok(())
    }
}

/// Check a contract against every rule.
///
/// Returns `Ok(())` when the data is valid, otherwise all violations in rule
/// order: required fields, IBAN, money, dates.
pub fn validate(input: &ContractInput) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    // 1. Required text fields
    let required = [
        (Field::TenantName, &input.tenant_name),
        (Field::DocumentNumber, &input.document_number),
        (Field::TenantTaxId, &input.tenant_tax_id),
        (Field::PropertyAddress, &input.property_address),
        (Field::StartDateWritten, &input.start_date_written),
        (Field::BankName, &input.bank_name),
        (Field::SigningLocation, &input.signing_location),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(field, Rule::Required));
        }
    }

    // 2. Identifier format
    if !is_valid_iban(&input.iban) {
        errors.push(ValidationError::new(Field::Iban, Rule::InvalidIban));
    }

    // 3. Money. Written as negated comparisons so NaN fails too.
    if !(input.rent_amount.is_finite() && input.rent_amount > 0.0) {
        errors.push(ValidationError::new(Field::RentAmount, Rule::NotPositive));
    }
    if !(input.deposit_amount.is_finite() && input.deposit_amount >= 0.0) {
        errors.push(ValidationError::new(Field::DepositAmount, Rule::Negative));
    }
    if !(input.condominium_fee.is_finite() && input.condominium_fee >= 0.0) {
        errors.push(ValidationError::new(Field::CondominiumFee, Rule::Negative));
    }

    // 4. Document dates
    match (input.document_issue_date, input.document_expiry_date) {
        (Some(issue), Some(expiry)) => {
            if expiry <= issue {
                errors.push(ValidationError::new(
                    Field::DocumentExpiryDate,
                    Rule::ExpiryNotAfterIssue,
                ));
            }
        }
        (issue, expiry) => {
            if issue.is_none() {
                errors.push(ValidationError::new(Field::DocumentIssueDate, Rule::Required));
            }
            if expiry.is_none() {
                errors.push(ValidationError::new(Field::DocumentExpiryDate, Rule::Required));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}

/// IBAN check: spaces removed and upper-cased, at least
/// [`IBAN_MIN_LEN`] ASCII alphanumerics starting with [`IBAN_COUNTRY_PREFIX`].
pub fn is_valid_iban(iban: &str) -> bool {
    let cleaned: String = iban
        .chars()
        .filter(|c| *c != ' ')
        .collect::<String>()
        .to_uppercase();
    cleaned.len() >= IBAN_MIN_LEN
        && cleaned.chars().all(|c| c.is_ascii_alphanumeric())
        && cleaned.starts_with(IBAN_COUNTRY_PREFIX)
}
