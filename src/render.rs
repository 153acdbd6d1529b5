//! Turn an [`ExtractionResult`] into display text.
//!
//! Rendering dispatches on the payload's `"type"` tag and nothing else:
//! `universal` gets a preview + section summary, `budget` gets a line-item
//! breakdown, and every other shape is dumped as pretty-printed JSON so no
//! server response is ever silently swallowed.
//!
//! The output is plain text with one fact per line — suitable for a
//! terminal, a text pane, or a log — and is a pure function of the payload.

use crate::model::{BudgetResult, ExtractionResult, UniversalResult};
use std::fmt::Write;

/// Maximum characters of `raw_text` shown in the preview.
pub const PREVIEW_CHAR_LIMIT: usize = 500;

/// Maximum section titles listed before eliding the rest.
pub const SECTION_TITLE_LIMIT: usize = 3;

/// Title shown for a section the service left unnamed.
pub const UNTITLED_SECTION: &str = "Sans titre";

impl crate::model::Extraction {
    /// Display text for this extraction, see [`render_result`].
    pub fn render(&self) -> String {
        render_result(&self.result)
    }
}

/// Render an extraction payload as display text.
pub fn render_result(result: &ExtractionResult) -> String {
    match result {
        ExtractionResult::Universal(u) => render_universal(u),
        ExtractionResult::Budget(b) => render_budget(b),
        ExtractionResult::Other(v) => {
            let dump = serde_json::to_string_pretty(v)
                .unwrap_or_else(|_| "<unrenderable payload>".to_string());
            format!("Données extraites:\n{dump}\n")
        }
    }
}

/// Truncate `text` to at most [`PREVIEW_CHAR_LIMIT`] characters, appending
/// an ellipsis marker when anything was cut.
///
/// Counted in characters, not bytes, so multi-byte text never truncates
/// mid-codepoint.
pub fn preview(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHAR_LIMIT).collect();
    if text.chars().count() > PREVIEW_CHAR_LIMIT {
        out.push_str("...");
    }
    out
}

fn render_universal(u: &UniversalResult) -> String {
    let mut out = String::new();
    let label = u.detected_type.as_deref().unwrap_or("Universal");
    let _ = writeln!(out, "Type détecté: {label}");
    out.push('\n');

    if let Some(raw) = u.raw_text.as_deref() {
        if !raw.is_empty() {
            let _ = writeln!(out, "Texte extrait (preview):\n{}", preview(raw));
            out.push('\n');
        }
    }

    if !u.sections.is_empty() {
        let _ = writeln!(out, "Sections détectées: {}", u.sections.len());
        for (idx, section) in u.sections.iter().take(SECTION_TITLE_LIMIT).enumerate() {
            let title = section
                .title
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED_SECTION);
            let _ = writeln!(out, "{}. {title}", idx + 1);
        }
    }

    out
}

fn render_budget(b: &BudgetResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total: {}€", format_amount(b.total));
    out.push('\n');
    for ligne in &b.lignes_budgetaires {
        let _ = writeln!(out, "{}: {}€", ligne.description, format_amount(ligne.montant));
    }
    out
}

/// Drop a trailing `.0` so whole-euro amounts print the way the service
/// sends them.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BudgetLine, Section};
    use serde_json::json;

    fn universal(raw_text: &str, titles: &[Option<&str>]) -> ExtractionResult {
        ExtractionResult::Universal(UniversalResult {
            detected_type: Some("formation".into()),
            raw_text: Some(raw_text.into()),
            sections: titles
                .iter()
                .map(|t| Section {
                    title: t.map(Into::into),
                })
                .collect(),
        })
    }

    #[test]
    fn preview_short_text_is_unchanged() {
        assert_eq!(preview("hello"), "hello");
    }

    #[test]
    fn preview_truncates_to_exactly_500_chars() {
        let long: String = std::iter::repeat('a').take(900).collect();
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHAR_LIMIT + 3);
        assert!(p.ends_with("..."));
        assert_eq!(&p[..PREVIEW_CHAR_LIMIT], &long[..PREVIEW_CHAR_LIMIT]);
    }

    #[test]
    fn preview_boundary_at_exactly_500() {
        let exact: String = std::iter::repeat('é').take(500).collect();
        assert_eq!(preview(&exact), exact);

        let over: String = std::iter::repeat('é').take(501).collect();
        let p = preview(&over);
        assert_eq!(p.chars().count(), 503);
        assert!(p.ends_with("..."));
    }

    #[test]
    fn universal_render_shows_label_preview_and_sections() {
        let long: String = std::iter::repeat('x').take(600).collect();
        let text = render_result(&universal(
            &long,
            &[Some("Intro"), None, Some("Annexe"), Some("Extra")],
        ));

        assert!(text.contains("Type détecté: formation"));
        assert!(text.contains("..."));
        assert!(text.contains("Sections détectées: 4"));
        assert!(text.contains("1. Intro"));
        assert!(text.contains("2. Sans titre"));
        assert!(text.contains("3. Annexe"));
        // Only the first three titles are listed.
        assert!(!text.contains("4. Extra"));
    }

    #[test]
    fn universal_without_detected_type_falls_back() {
        let result = ExtractionResult::Universal(UniversalResult {
            detected_type: None,
            raw_text: None,
            sections: vec![],
        });
        assert!(render_result(&result).contains("Type détecté: Universal"));
    }

    #[test]
    fn budget_render_lists_lines_and_total() {
        let result = ExtractionResult::Budget(BudgetResult {
            total: 1000.0,
            lignes_budgetaires: vec![BudgetLine {
                description: "Rent".into(),
                montant: 1000.0,
            }],
        });
        let text = render_result(&result);
        assert!(text.contains("Total: 1000€"));
        assert!(text.contains("Rent: 1000€"));
    }

    #[test]
    fn budget_render_keeps_cents() {
        let result = ExtractionResult::Budget(BudgetResult {
            total: 10.5,
            lignes_budgetaires: vec![],
        });
        assert!(render_result(&result).contains("Total: 10.5€"));
    }

    #[test]
    fn other_render_dumps_pretty_json() {
        let raw = json!({"type": "voirie", "routes": ["D12"]});
        let text = render_result(&ExtractionResult::Other(raw));
        assert!(text.starts_with("Données extraites:"));
        assert!(text.contains("\"voirie\""));
        assert!(text.contains("\"D12\""));
    }
}
