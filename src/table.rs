use std::borrow::Cow;
use std::fmt::Write as _;

use crate::classify::ColumnProfile;

/// Renders rows under a header as left-aligned columns separated by two spaces.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(sanitize_cell(cell).chars().count());
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths));
    let rule = widths
        .iter()
        .map(|w| "-".repeat((*w).max(3)))
        .collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

/// One line per column: kind, cardinality, name matches, role and action.
pub fn render_profiles(profiles: &[ColumnProfile]) -> String {
    let headers = ["column", "kind", "distinct", "ratio", "matches", "role", "action"]
        .map(String::from)
        .to_vec();
    let rows = profiles
        .iter()
        .map(|p| {
            let matches = if p.name_matches.is_empty() {
                "-".to_string()
            } else {
                p.name_matches
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            };
            vec![
                p.name.clone(),
                p.kind.as_str().to_string(),
                p.distinct.to_string(),
                format!("{:.3}", p.ratio),
                matches,
                p.role.as_str().to_string(),
                p.action.as_str().to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&headers, &rows)
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let line = values
        .iter()
        .zip(widths)
        .map(|(value, width)| format!("{:<width$}", sanitize_cell(value), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
