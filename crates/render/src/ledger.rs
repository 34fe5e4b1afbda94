use models::LedgerEntry;

use crate::format::Formatter;
use crate::html::text;

pub const EMPTY_LEDGER: &str = "<p>No contributions recorded yet.</p>";

/// Ledger markup plus the text of the running-total display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerView {
    pub html: String,
    pub total: String,
}

pub fn render_ledger(entries: &[LedgerEntry], fmt: &Formatter) -> LedgerView {
    if entries.is_empty() {
        return LedgerView {
            html: EMPTY_LEDGER.to_string(),
            total: format!("Total: {}", fmt.currency(0.0)),
        };
    }

    let mut total = 0.0;
    let mut html = String::new();
    for entry in entries {
        total += entry.amount();
        html.push_str(&render_entry(entry, fmt));
    }

    LedgerView {
        html,
        total: format!("Total: {}", fmt.currency(total)),
    }
}

fn render_entry(entry: &LedgerEntry, fmt: &Formatter) -> String {
    let mut out = String::from(r#"<article class="entry"><div class="entry-header">"#);
    out.push_str(&format!(
        "<strong>{}</strong><span>{}</span></div>",
        text(entry.display_name()),
        fmt.currency(entry.amount())
    ));
    out.push_str(&format!(
        r#"<div class="meta">Logged: {}</div>"#,
        text(&fmt.date_time(&entry.created_at))
    ));
    if let Some(message) = entry.message.as_deref().filter(|m| !m.is_empty()) {
        out.push_str(&format!(r#"<p class="entry-message">{}</p>"#, text(message)));
    }
    out.push_str("</article>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: Option<&str>, amount: Option<f64>, message: Option<&str>) -> LedgerEntry {
        LedgerEntry {
            id: String::new(),
            name: name.map(str::to_string),
            amount,
            message: message.map(str::to_string),
            created_at: "2024-01-02T03:04:05Z".into(),
        }
    }

    #[test]
    fn test_empty_ledger() {
        let view = render_ledger(&[], &Formatter::default());
        assert_eq!(view.html, "<p>No contributions recorded yet.</p>");
        assert_eq!(view.total, "Total: $0.00");
    }

    #[test]
    fn test_total_sums_amounts_and_treats_missing_as_zero() {
        let entries = vec![
            entry(Some("Ada"), Some(1000.0), None),
            entry(None, None, Some("hi")),
            entry(Some("Bo"), Some(0.5), None),
        ];
        let view = render_ledger(&entries, &Formatter::default());

        assert_eq!(view.total, "Total: $1,000.50");
        assert!(view.html.contains("<strong>Anonymous</strong><span>$0.00</span>"));
        assert!(view.html.contains(r#"<p class="entry-message">hi</p>"#));
        assert!(view.html.contains("Logged: 1/2/2024, 3:04:05 AM"));
        assert_eq!(view.html.matches("<article").count(), 3);
    }

    #[test]
    fn test_message_is_encoded() {
        let entries = vec![entry(Some("A&B"), Some(1.0), Some("<img src=x>"))];
        let view = render_ledger(&entries, &Formatter::default());
        assert!(view.html.contains("A&amp;B"));
        assert!(view.html.contains("&lt;img src=x&gt;"));
    }
}
