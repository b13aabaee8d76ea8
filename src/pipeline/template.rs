//! Placeholder scanning and strict substitution.
//!
//! A placeholder is `{{ name }}`. In DOCX sources Word frequently splits a tag
//! across several runs (`{{</w:t></w:r><w:r><w:t>inquilino }}`), so markup
//! is allowed between the braces and inside the tag; it is dropped when the
//! tag is replaced. The same scanner serves plain text, where there is no
//! markup to skip.

use crate::error::TemplateError;
use crate::pipeline::context::RenderContext;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::ops::Range;

/// `{{ … }}` with optional XML tags between the paired braces.
static RE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{(?:<[^>]*>)*\{(.*?)\}(?:<[^>]*>)*\}").expect("valid tag regex")
});

/// An opening `{{`, possibly split by markup.
static RE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(?:<[^>]*>)*\{").expect("valid open regex"));

static RE_MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid markup regex"));

static RE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid name regex"));

/// How substituted values are written into the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// Inserted verbatim (plain-text templates).
    None,
    /// XML-escaped (WordprocessingML parts).
    Xml,
}

/// One placeholder occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    /// Byte range of the whole tag, braces included.
    pub span: Range<usize>,
    pub name: String,
}

/// Locate every placeholder in `source`.
///
/// Fails on a tag whose content is not an identifier, or on a `{{` that is
/// never closed.
pub fn scan(source: &str) -> Result<Vec<Slot>, TemplateError> {
    let mut slots = Vec::new();
    let mut cursor = 0;

    for caps in RE_TAG.captures_iter(source) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        check_gap(source, cursor..whole.start())?;

        let text = RE_MARKUP.replace_all(inner.as_str(), "");
        let name = text.trim();
        if !RE_NAME.is_match(name) {
            return Err(TemplateError::InvalidPlaceholder {
                fragment: text.into_owned(),
            });
        }
        slots.push(Slot {
            span: whole.range(),
            name: name.to_string(),
        });
        cursor = whole.end();
    }
    check_gap(source, cursor..source.len())?;

    Ok(slots)
}

/// Text between tags must not open another one.
fn check_gap(source: &str, gap: Range<usize>) -> Result<(), TemplateError> {
    match RE_OPEN.find(&source[gap.clone()]) {
        Some(m) => Err(TemplateError::Unclosed {
            offset: gap.start + m.start(),
        }),
        None => Ok(()),
    }
}

/// Distinct placeholder names used by `source`.
pub fn placeholders(source: &str) -> Result<BTreeSet<String>, TemplateError> {
    Ok(scan(source)?.into_iter().map(|s| s.name).collect())
}

/// Replace every placeholder in `source` with its context value.
///
/// All names absent from `context` are reported together, sorted. Context
/// keys the template does not use are ignored.
pub fn substitute(
    source: &str,
    context: &RenderContext,
    escape: Escape,
) -> Result<String, TemplateError> {
    let slots = scan(source)?;

    let missing: BTreeSet<&str> = slots
        .iter()
        .map(|s| s.name.as_str())
        .filter(|name| !context.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        return Err(TemplateError::MissingPlaceholders(
            missing.into_iter().map(String::from).collect(),
        ));
    }

    let mut out = String::with_capacity(source.len() + 512);
    let mut cursor = 0;
    for slot in &slots {
        out.push_str(&source[cursor..slot.span.start]);
        // Presence checked above.
        let value = context.get(&slot.name).map(String::as_str).unwrap_or_default();
        out.push_str(&escape_value(value, escape));
        cursor = slot.span.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

fn escape_value(value: &str, escape: Escape) -> Cow<'_, str> {
    match escape {
        Escape::None => Cow::Borrowed(value),
        Escape::Xml => quick_xml::escape::escape(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(pairs: &[(&str, &str)]) -> RenderContext {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn scan_plain_text() {
        let slots = scan("Olá {{ inquilino }}, renda {{valor_renda}}.").unwrap();
        let names: Vec<&str> = slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["inquilino", "valor_renda"]);
        // "Olá " is five bytes.
        assert_eq!(slots[0].span, 5..20);
    }

    #[test]
    fn substitute_plain_text() {
        let out = substitute(
            "{{ inquilino }} paga {{ valor_renda }}; {{ inquilino }} assina.",
            &ctx(&[
                ("inquilino", "Pedro"),
                ("valor_renda", "AOA 115.000,00"),
                ("unused", "x"),
            ]),
            Escape::None,
        )
        .unwrap();
        assert_eq!(out, "Pedro paga AOA 115.000,00; Pedro assina.");
    }

    #[test]
    fn missing_placeholders_reported_together() {
        let err = substitute("{{ b }} {{ a }} {{ c }} {{ b }}", &ctx(&[("c", "")]), Escape::None)
            .unwrap_err();
        assert_eq!(
            err,
            TemplateError::MissingPlaceholders(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn split_runs_are_merged() {
        let xml = r#"<w:p><w:r><w:t>Sr. {</w:t></w:r><w:r><w:t>{ inqui</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>lino }}</w:t></w:r></w:p>"#;
        assert_eq!(
            placeholders(xml).unwrap(),
            BTreeSet::from(["inquilino".to_string()])
        );
        let out = substitute(xml, &ctx(&[("inquilino", "Ana & Filhos")]), Escape::Xml).unwrap();
        assert_eq!(
            out,
            "<w:p><w:r><w:t>Sr. Ana &amp; Filhos</w:t></w:r></w:p>"
        );
    }

    #[test]
    fn invalid_placeholder_rejected() {
        assert_eq!(
            scan("{{ not a name }}").unwrap_err(),
            TemplateError::InvalidPlaceholder {
                fragment: " not a name ".into()
            }
        );
        assert!(scan("{{}}").is_err());
    }

    #[test]
    fn unclosed_placeholder_rejected() {
        assert_eq!(
            scan("ok {{ a }} then {{ b").unwrap_err(),
            TemplateError::Unclosed { offset: 16 }
        );
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let src = "Sem marcadores { nem } chavetas soltas }}";
        assert_eq!(substitute(src, &RenderContext::new(), Escape::None).unwrap(), src);
    }
}
