use unicode_width::UnicodeWidthStr;

use super::TableView;

/// Render a view as an aligned plain-text grid for terminal output.
pub fn render(view: &TableView) -> String {
    let (header, body) = match view {
        TableView::Placeholder { message } => return format!("{message}\n"),
        TableView::Grid { header, body } => (header, body),
    };

    // Rows may be wider than the header if a caller built the view by hand.
    let n_cols = body
        .iter()
        .map(Vec::len)
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; n_cols];
    for line in std::iter::once(header).chain(body.iter()) {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.width());
        }
    }

    let mut out = String::new();
    push_line(&mut out, header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for line in body {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.width())));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
