//! Normalisation: turn validated input into the exact strings the template
//! prints.
//!
//! Currency is grouped digit by digit from an integer count of minor units
//! rather than by post-editing a locale-formatted float, so the separators
//! come only from [`CurrencyFormat`].

use crate::config::GeneratorConfig;
use crate::contract::ContractInput;
use crate::error::NormalizeError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Portuguese month names, indexed by `month - 1`.
const MONTHS_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// How monetary amounts are printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    /// ISO currency code printed before the amount. Default: `AOA`.
    pub code: String,
    /// Thousands separator. Default: `.`.
    pub grouping_separator: char,
    /// Decimal separator. Default: `,`.
    pub decimal_separator: char,
    /// Digits after the decimal separator. Default: 2.
    pub decimals: u8,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            code: "AOA".to_string(),
            grouping_separator: '.',
            decimal_separator: ',',
            decimals: 2,
        }
    }
}

/// Contract fields in their final textual form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedContract {
    pub landlord_name: String,
    pub landlord_tax_id: String,
    pub landlord_address: String,
    pub representative_name: String,
    pub tenant_name: String,
    pub tenant_tax_id: String,
    pub tenant_contact: String,
    pub tenant_email: String,
    pub document_type: String,
    pub document_number: String,
    pub document_issue_date: String,
    pub document_expiry_date: String,
    pub property_address: String,
    pub start_date_written: String,
    pub end_date_written: String,
    pub rent: String,
    pub payment_method: String,
    pub deposit: String,
    pub condominium_fee: String,
    pub bank_name: String,
    pub iban: String,
    pub signing_line: String,
}

/// Trim surrounding whitespace.
pub fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Trim an optional value; absent becomes the empty string.
pub fn clean_optional(value: Option<&str>) -> String {
    value.map(clean).unwrap_or_default()
}

/// Format `amount` as e.g. `"AOA 150.000,00"`.
///
/// Rounds half away from zero to `format.decimals` places.
pub fn format_currency(amount: f64, format: &CurrencyFormat) -> Result<String, NormalizeError> {
    if !amount.is_finite() {
        return Err(NormalizeError::NonFiniteAmount(amount));
    }

    let scale = 10u128
        .checked_pow(u32::from(format.decimals))
        .ok_or(NormalizeError::DecimalsOutOfRange(format.decimals))?;
    let scaled = (amount.abs() * scale as f64).round();
    // `as u128` saturates; anything at the ceiling is not the real amount.
    if scaled >= u128::MAX as f64 {
        return Err(NormalizeError::AmountOutOfRange(amount));
    }
    let minor = scaled as u128;
    let whole = minor / scale;
    let fraction = minor % scale;

    let mut out = String::with_capacity(format.code.len() + 24);
    out.push_str(&format.code);
    out.push(' ');
    if amount < 0.0 && minor > 0 {
        out.push('-');
    }
    out.push_str(&group_digits(whole, format.grouping_separator));
    if format.decimals > 0 {
        out.push(format.decimal_separator);
        out.push_str(&format!(
            "{:0width$}",
            fraction,
            width = usize::from(format.decimals)
        ));
    }
    Ok(out)
}

/// Insert `separator` between every group of three digits.
fn group_digits(value: u128, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Portuguese name of a 1-based month number.
pub fn month_name(month: u32) -> Result<&'static str, NormalizeError> {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS_PT.get(i as usize))
        .copied()
        .ok_or(NormalizeError::MonthOutOfRange(month))
}

/// `"<location>, aos <day> de <Month> de <year>"`.
pub fn signing_line(location: &str, date: NaiveDate) -> Result<String, NormalizeError> {
    Ok(format!(
        "{}, aos {} de {} de {}",
        location.trim(),
        date.day(),
        month_name(date.month())?,
        date.year()
    ))
}

/// Normalise every field of a validated contract.
///
/// `today` fills in a missing signing date. Document dates are printed with
/// [`GeneratorConfig::date_format`]; a missing one prints as empty (the
/// validator rejects that case before rendering).
pub fn normalize(
    input: &ContractInput,
    config: &GeneratorConfig,
    today: NaiveDate,
) -> Result<NormalizedContract, NormalizeError> {
    // `build()` rejects bad formats, but the field is public; fall back to ISO.
    let fmt_date = |d: Option<NaiveDate>| {
        d.map(|d| {
            let mut out = String::new();
            match write!(out, "{}", d.format(&config.date_format)) {
                Ok(()) => out,
                Err(_) => d.to_string(),
            }
        })
        .unwrap_or_default()
    };

    Ok(NormalizedContract {
        landlord_name: clean_optional(input.landlord_name.as_deref()),
        landlord_tax_id: clean_optional(input.landlord_tax_id.as_deref()),
        landlord_address: clean_optional(input.landlord_address.as_deref()),
        representative_name: clean_optional(input.representative_name.as_deref()),
        tenant_name: clean(&input.tenant_name),
        tenant_tax_id: clean(&input.tenant_tax_id),
        tenant_contact: clean_optional(input.tenant_contact.as_deref()),
        tenant_email: clean_optional(input.tenant_email.as_deref()),
        document_type: input.document_type.label().to_string(),
        document_number: clean(&input.document_number),
        document_issue_date: fmt_date(input.document_issue_date),
        document_expiry_date: fmt_date(input.document_expiry_date),
        property_address: clean(&input.property_address),
        start_date_written: clean(&input.start_date_written),
        end_date_written: clean_optional(input.end_date_written.as_deref()),
        rent: format_currency(input.rent_amount, &config.currency)?,
        payment_method: clean_optional(input.payment_method.as_deref()),
        deposit: format_currency(input.deposit_amount, &config.currency)?,
        condominium_fee: format_currency(input.condominium_fee, &config.currency)?,
        bank_name: clean(&input.bank_name),
        iban: clean(&input.iban),
        signing_line: signing_line(
            &input.signing_location,
            input.signing_date.unwrap_or(today),
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DocumentType;

    fn aoa(amount: f64) -> String {
        format_currency(amount, &CurrencyFormat::default()).unwrap()
    }

    #[test]
    fn currency_examples() {
        assert_eq!(aoa(150_000.0), "AOA 150.000,00");
        assert_eq!(aoa(0.0), "AOA 0,00");
        assert_eq!(aoa(999.999), "AOA 1.000,00");
        assert_eq!(aoa(1_234_567.891), "AOA 1.234.567,89");
        assert_eq!(aoa(12.5), "AOA 12,50");
        assert_eq!(aoa(100.0), "AOA 100,00");
    }

    #[test]
    fn currency_negative_and_non_finite() {
        assert_eq!(aoa(-1500.0), "AOA -1.500,00");
        assert_eq!(aoa(-0.0001), "AOA 0,00");
        assert_eq!(
            format_currency(f64::INFINITY, &CurrencyFormat::default()),
            Err(NormalizeError::NonFiniteAmount(f64::INFINITY))
        );
        assert!(format_currency(f64::NAN, &CurrencyFormat::default()).is_err());
    }

    #[test]
    fn currency_rejects_amounts_beyond_minor_unit_range() {
        assert_eq!(
            format_currency(1e40, &CurrencyFormat::default()),
            Err(NormalizeError::AmountOutOfRange(1e40))
        );
        assert_eq!(
            format_currency(-1e40, &CurrencyFormat::default()),
            Err(NormalizeError::AmountOutOfRange(-1e40))
        );
        // Beyond u64 but exactly representable: no saturation.
        assert_eq!(aoa(2f64.powi(70)), "AOA 1.180.591.620.717.411.303.424,00");
    }

    #[test]
    fn currency_rejects_unrepresentable_decimals() {
        let wide = CurrencyFormat {
            decimals: 40,
            ..CurrencyFormat::default()
        };
        assert_eq!(
            format_currency(1.0, &wide),
            Err(NormalizeError::DecimalsOutOfRange(40))
        );
    }

    #[test]
    fn currency_follows_format() {
        let usd = CurrencyFormat {
            code: "USD".into(),
            grouping_separator: ',',
            decimal_separator: '.',
            decimals: 0,
        };
        assert_eq!(format_currency(1_234_567.6, &usd).unwrap(), "USD 1,234,568");
    }

    #[test]
    fn month_table_is_total() {
        assert_eq!(month_name(1), Ok("Janeiro"));
        assert_eq!(month_name(3), Ok("Março"));
        assert_eq!(month_name(9), Ok("Setembro"));
        assert_eq!(month_name(10), Ok("Outubro"));
        assert_eq!(month_name(12), Ok("Dezembro"));
        assert_eq!(month_name(0), Err(NormalizeError::MonthOutOfRange(0)));
        assert_eq!(month_name(13), Err(NormalizeError::MonthOutOfRange(13)));
    }

    #[test]
    fn signing_line_format() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        assert_eq!(
            signing_line(" Luanda ", date).unwrap(),
            "Luanda, aos 1 de Julho de 2025"
        );
    }

    #[test]
    fn normalize_fills_defaults() {
        let input = ContractInput {
            tenant_name: "  Pedro Miguel ".into(),
            document_type: DocumentType::Passaporte,
            document_issue_date: NaiveDate::from_ymd_opt(2020, 1, 1),
            rent_amount: 115_000.0,
            signing_location: "Luanda".into(),
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        let n = normalize(&input, &GeneratorConfig::default(), today).unwrap();

        assert_eq!(n.tenant_name, "Pedro Miguel");
        assert_eq!(n.tenant_email, "");
        assert_eq!(n.document_type, "Passaporte");
        assert_eq!(n.document_issue_date, "01/01/2020");
        assert_eq!(n.document_expiry_date, "");
        assert_eq!(n.rent, "AOA 115.000,00");
        assert_eq!(n.deposit, "AOA 0,00");
        assert_eq!(n.signing_line, "Luanda, aos 25 de Outubro de 2025");
    }
}
