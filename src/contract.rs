//! The contract record collected per submission.
//!
//! [`ContractInput`] is deliberately flat and lenient: required text fields
//! default to the empty string when absent so that the validator, not serde,
//! reports what is missing. Each field also accepts the placeholder key the
//! template uses for it (`inquilino`, `valor_renda`, …), so data exported for
//! the template can be fed back in unchanged.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity document presented by the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passaporte,
    /// Angolan national identity card. (default)
    #[default]
    BilheteDeIdentidade,
}

impl DocumentType {
    /// The label printed in the contract.
    pub fn label(self) -> &'static str {
        match self {
            DocumentType::Passaporte => "Passaporte",
            DocumentType::BilheteDeIdentidade => "Bilhete de Identidade",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw contract data for one submission: landlord, tenant, property and
/// financial terms.
///
/// Dates use ISO `YYYY-MM-DD` in JSON. Monetary amounts are in kwanzas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractInput {
    // ── Landlord ─────────────────────────────────────────────────────────
    #[serde(alias = "senhorio")]
    pub landlord_name: Option<String>,
    #[serde(alias = "senhorio_nif")]
    pub landlord_tax_id: Option<String>,
    #[serde(alias = "senhorio_address")]
    pub landlord_address: Option<String>,
    pub representative_name: Option<String>,

    // ── Tenant ───────────────────────────────────────────────────────────
    #[serde(alias = "inquilino")]
    pub tenant_name: String,
    #[serde(alias = "inquilino_nif")]
    pub tenant_tax_id: String,
    #[serde(alias = "inquilino_contact")]
    pub tenant_contact: Option<String>,
    #[serde(alias = "inquilino_email")]
    pub tenant_email: Option<String>,

    // ── Tenant identity document ─────────────────────────────────────────
    pub document_type: DocumentType,
    #[serde(alias = "inquilino_id_nr")]
    pub document_number: String,
    pub document_issue_date: Option<NaiveDate>,
    pub document_expiry_date: Option<NaiveDate>,

    // ── Property and term ────────────────────────────────────────────────
    #[serde(alias = "endereco_imovel")]
    pub property_address: String,
    /// Start of the lease written out, e.g. "25 de Outubro de 2025".
    pub start_date_written: String,
    pub end_date_written: Option<String>,

    // ── Money ────────────────────────────────────────────────────────────
    #[serde(alias = "valor_renda")]
    pub rent_amount: f64,
    #[serde(alias = "forma_pagamento")]
    pub payment_method: Option<String>,
    #[serde(alias = "valor_caucao")]
    pub deposit_amount: f64,
    #[serde(alias = "taxa_condominio")]
    pub condominium_fee: f64,
    pub bank_name: String,
    pub iban: String,

    // ── Signing ──────────────────────────────────────────────────────────
    #[serde(alias = "contract_location")]
    pub signing_location: String,
    /// Defaults to the day the contract is generated.
    #[serde(alias = "contract_date")]
    pub signing_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_deserialises_to_defaults() {
        let input: ContractInput = serde_json::from_str("{}").unwrap();
        assert!(input.tenant_name.is_empty());
        assert_eq!(input.rent_amount, 0.0);
        assert_eq!(input.document_type, DocumentType::BilheteDeIdentidade);
        assert!(input.document_issue_date.is_none());
    }

    #[test]
    fn template_keys_are_accepted_as_aliases() {
        let input: ContractInput = serde_json::from_str(
            r#"{
                "inquilino": "Pedro Miguel",
                "valor_renda": 115000.0,
                "endereco_imovel": "Rua Imóvel 99",
                "document_type": "passaporte",
                "document_issue_date": "2020-01-01"
            }"#,
        )
        .unwrap();
        assert_eq!(input.tenant_name, "Pedro Miguel");
        assert_eq!(input.rent_amount, 115000.0);
        assert_eq!(input.property_address, "Rua Imóvel 99");
        assert_eq!(input.document_type, DocumentType::Passaporte);
        assert_eq!(
            input.document_issue_date,
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
    }

    #[test]
    fn document_type_labels() {
        assert_eq!(DocumentType::Passaporte.to_string(), "Passaporte");
        assert_eq!(
            DocumentType::BilheteDeIdentidade.to_string(),
            "Bilhete de Identidade"
        );
    }
}
