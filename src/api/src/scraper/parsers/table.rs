//! Generic results-table walking for stats engine pages.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

fn page_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Page\s*(\d+)\s*of\s*(\d+)$").expect("valid page regex"))
}

/// Trimmed cell texts of every data row on the page.
///
/// Rows with fewer than two cells (headers) and the page banner are dropped.
pub fn data_rows(html: &str) -> Vec<Vec<String>> {
    let document = Html::parse_document(html);

    let mut rows = select_rows(&document, "table.engineTable tr.data1");
    if rows.is_empty() {
        rows = select_rows(&document, "table tr");
    }
    rows
}

fn select_rows(document: &Html, row_selector: &str) -> Vec<Vec<String>> {
    let (Ok(row_sel), Ok(cell_sel)) = (Selector::parse(row_selector), Selector::parse("td")) else {
        return Vec::new();
    };

    document
        .select(&row_sel)
        .map(|row| row.select(&cell_sel).map(cell_text).collect::<Vec<_>>())
        .filter(|cells| cells.len() > 1 && banner(&cells[0]).is_none())
        .collect()
}

fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `(current, total)` from the "Page X of Y" banner.
///
/// The engine bolds both numbers, so the banner is read from cell text.
pub fn page_count(html: &str) -> Option<(u32, u32)> {
    let document = Html::parse_document(html);
    let cell_sel = Selector::parse("td").ok()?;
    document
        .select(&cell_sel)
        .find_map(|cell| banner(&cell_text(cell)))
}

fn banner(text: &str) -> Option<(u32, u32)> {
    let caps = page_re().captures(text)?;
    let current = caps[1].parse().ok()?;
    let total = caps[2].parse().ok()?;
    Some((current, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_rows_preferred() {
        let html = r#"
            <table class="engineTable">
              <tr class="head"><th>Player</th><th>Runs</th></tr>
              <tr class="data1"><td>Page 1 of 2018</td></tr>
              <tr class="data1"><td> JE Root (ENG) </td><td>118*</td></tr>
              <tr class="data2"><td>spacer</td><td>x</td></tr>
            </table>
            <table><tr><td>nav</td><td>links</td></tr></table>"#;

        let rows = data_rows(html);
        assert_eq!(rows, vec![vec!["JE Root (ENG)".to_string(), "118*".to_string()]]);
    }

    #[test]
    fn test_fallback_to_plain_rows() {
        let html = r#"
            <table>
              <tr><th>Team</th><th>Score</th></tr>
              <tr><td>India</td><td>
                  445</td></tr>
              <tr><td>Australia</td><td>109</td></tr>
            </table>"#;

        let rows = data_rows(html);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["India", "445"]);
    }

    #[test]
    fn test_no_table() {
        assert!(data_rows("<html><body><p>Nothing</p></body></html>").is_empty());
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count("<table><tr><td>Page 3 of 2018</td></tr></table>"), Some((3, 2018)));
        assert_eq!(page_count("<table><tr><td>No records</td></tr></table>"), None);
    }

    #[test]
    fn test_page_count_from_bold_banner() {
        let html = r#"
            <table class="engineTable"><tr class="data1">
              <td>Page <b>1</b> of <b>2018</b></td><td>Showing 1 - 50</td>
            </tr></table>"#;
        assert_eq!(page_count(html), Some((1, 2018)));
        assert!(data_rows(html).is_empty());
    }

    #[test]
    fn test_page_count_from_unspaced_banner() {
        let html = "<table><tr><td>Page<b>7</b>of<b>12</b></td></tr></table>";
        assert_eq!(page_count(html), Some((7, 12)));
    }
}
