//! Context assembly: map normalised fields onto the template's placeholder
//! names.

use crate::boilerplate::Boilerplate;
use crate::pipeline::normalize::NormalizedContract;
use std::collections::BTreeMap;

/// The flat placeholder → value mapping handed to the renderer.
pub type RenderContext = BTreeMap<String, String>;

/// Every key [`build_context`] produces. A template may use any subset.
pub const PLACEHOLDER_KEYS: [&str; 25] = [
    "senhorio",
    "senhorio_nif",
    "senhorio_address",
    "representative_name",
    "inquilino",
    "inquilino_nif",
    "inquilino_contact",
    "inquilino_email",
    "endereco_imovel",
    "document_type",
    "document_number",
    "document_issue_date",
    "document_expiry_date",
    "start_date_written",
    "end_date_written",
    "bank_name",
    "iban",
    "contract_date_local",
    "valor_renda",
    "forma_pagamento",
    "valor_caucao",
    "taxa_condominio",
    "governing_law",
    "signature_employer",
    "signature_employee",
];

/// Build the render context from a normalised contract.
pub fn build_context(contract: &NormalizedContract, boilerplate: &Boilerplate) -> RenderContext {
    let c = contract;
    let pairs: [(&str, &str); 25] = [
        ("senhorio", &c.landlord_name),
        ("senhorio_nif", &c.landlord_tax_id),
        ("senhorio_address", &c.landlord_address),
        ("representative_name", &c.representative_name),
        ("inquilino", &c.tenant_name),
        ("inquilino_nif", &c.tenant_tax_id),
        ("inquilino_contact", &c.tenant_contact),
        ("inquilino_email", &c.tenant_email),
        ("endereco_imovel", &c.property_address),
        ("document_type", &c.document_type),
        ("document_number", &c.document_number),
        ("document_issue_date", &c.document_issue_date),
        ("document_expiry_date", &c.document_expiry_date),
        ("start_date_written", &c.start_date_written),
        ("end_date_written", &c.end_date_written),
        ("bank_name", &c.bank_name),
        ("iban", &c.iban),
        ("contract_date_local", &c.signing_line),
        ("valor_renda", &c.rent),
        ("forma_pagamento", &c.payment_method),
        ("valor_caucao", &c.deposit),
        ("taxa_condominio", &c.condominium_fee),
        ("governing_law", &boilerplate.governing_law),
        ("signature_employer", &boilerplate.signature_line),
        ("signature_employee", &boilerplate.signature_line),
    ];

    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
