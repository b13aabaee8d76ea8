//! Static contract text: the built-in template and the fixed clauses every
//! contract carries.
//!
//! Callers can override the clauses via [`crate::config::GeneratorConfig::boilerplate`]
//! and the template via [`crate::config::GeneratorConfig::template_path`];
//! the constants here are used only when no override is provided.

use serde::{Deserialize, Serialize};

/// Governing-law clause printed in every contract.
pub const DEFAULT_GOVERNING_LAW: &str = "Lei Geral do Trabalho, Lei n.º 12/23";

/// Blank line left for hand signatures.
pub const DEFAULT_SIGNATURE_LINE: &str = "___________________";

/// Static values that fill the boilerplate placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boilerplate {
    pub governing_law: String,
    /// Used for both the landlord and the tenant signature slots.
    pub signature_line: String,
}

impl Default for Boilerplate {
    fn default() -> Self {
        Self {
            governing_law: DEFAULT_GOVERNING_LAW.to_string(),
            signature_line: DEFAULT_SIGNATURE_LINE.to_string(),
        }
    }
}

/// Plain-text urban rental contract using every placeholder in
/// [`crate::pipeline::context::PLACEHOLDER_KEYS`].
///
/// Written to disk by `leasegen init-template`.
pub const DEFAULT_TEMPLATE: &str = r#"CONTRATO DE ARRENDAMENTO URBANO
Para fins Habitacionais

ENTRE
{{ senhorio }}
E
{{ inquilino }}

ENTRE:

{{ senhorio }}, sociedade registada ao abrigo das leis Angolana, com sede social na Rua {{ senhorio_address }} com número contribuinte n.º {{ senhorio_nif }}, representada neste acto pelo Sr. {{ representative_name }}, na qualidade de Gerente, com poderes para o acto, doravante designado, abreviadamente "SENHORIO".

E

{{ inquilino }}, pessoa singular, portador do {{ document_type }} {{ document_number }}, emitido em {{ document_issue_date }}, válido até {{ document_expiry_date }}, NIF {{ inquilino_nif }}, adiante abreviadamente designado por ARRENDATÁRIO.

Individualmente designadas por "Parte" e colectivamente por "Partes"

CONSIDERANDO QUE:
O SENHORIO declara ser o dono e legítimo proprietário do {{ endereco_imovel }}, na província de Luanda, destinado a habitação, doravante designado "imóvel".

CLÁUSULA SEGUNDA (Vigência)
O contrato terá o prazo de 1(um) ano com início a {{ start_date_written }} e término a {{ end_date_written }}, sendo automaticamente renovável por períodos sucessivos.

CLÁUSULA TERCEIRA (Renda e Formas de Pagamento)
As Partes acordam um valor mensal da renda equivalente a {{ valor_renda }}.
O pagamento da renda será efectuado por {{ forma_pagamento }} nos primeiros 8 dias úteis, para a conta do SENHORIO no {{ bank_name }}, IBAN {{ iban }}.
Caução: {{ valor_caucao }}.

CLÁUSULA QUARTA (Encargos)
Taxa de condomínio: {{ taxa_condominio }}.

CLÁUSULA DÉCIMA SEGUNDA (Lei Aplicável)
Ao presente contrato aplica-se a {{ governing_law }}.

CLÁUSULA DÉCIMA TERCEIRA (Notificações)
Os contactos do Arrendatário:
Tel.: {{ inquilino_contact }}
Email: {{ inquilino_email }}

{{ contract_date_local }}

P/SENHORIO {{ signature_employer }}
P/ ARRENDATÁRIO {{ signature_employee }}
"#;
