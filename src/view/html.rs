use std::fmt::Write;

use super::TableView;
use crate::data::columns::ColumnRegistry;
use crate::data::filter::FilterMode;

// ---------------------------------------------------------------------------
// Element ids shared by every surface
// ---------------------------------------------------------------------------

pub const PRIMARY_COLUMN_ID: &str = "primary-column";
pub const OPERATION_COLUMNS_ID: &str = "operation-columns";
pub const SHEET_CONTENT_ID: &str = "sheet-content";
pub const OPERATION_ID: &str = "operation";
pub const APPLY_OPERATION_ID: &str = "apply-operation";

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Inner markup of the `sheet-content` container.
pub fn render_table(view: &TableView) -> String {
    let mut out = String::new();
    match view {
        TableView::Placeholder { message } => {
            let _ = write!(out, "<p>{}</p>", escape(message));
        }
        TableView::Grid { header, body } => {
            out.push_str("<table>\n<tr>");
            for h in header {
                let _ = write!(out, "<th>{}</th>", escape(h));
            }
            out.push_str("</tr>\n");
            for row in body {
                out.push_str("<tr>");
                for cell in row {
                    let _ = write!(out, "<td>{}</td>", escape(cell));
                }
                out.push_str("</tr>\n");
            }
            out.push_str("</table>");
        }
    }
    out
}

/// Full viewer page: selection controls plus the current table.
pub fn render_page(registry: &ColumnRegistry, mode: FilterMode, view: &TableView) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Sheet Viewer</title></head>\n<body>\n");

    let _ = writeln!(out, "<select id=\"{PRIMARY_COLUMN_ID}\">");
    for col in &registry.primary_options {
        let selected = if registry.primary.as_deref() == Some(col.as_str()) {
            " selected"
        } else {
            ""
        };
        let col = escape(col);
        let _ = writeln!(out, "<option value=\"{col}\"{selected}>{col}</option>");
    }
    out.push_str("</select>\n");

    let _ = writeln!(out, "<div id=\"{OPERATION_COLUMNS_ID}\">");
    for choice in &registry.operation_columns {
        let checked = if choice.checked { " checked" } else { "" };
        let name = escape(&choice.name);
        let _ = writeln!(
            out,
            "<label><input type=\"checkbox\" value=\"{name}\"{checked}>{name}</label><br>"
        );
    }
    out.push_str("</div>\n");

    let _ = writeln!(out, "<select id=\"{OPERATION_ID}\">");
    for m in FilterMode::ALL {
        let selected = if m == mode { " selected" } else { "" };
        let _ = writeln!(
            out,
            "<option value=\"{}\"{selected}>{}</option>",
            m.value(),
            m.label()
        );
    }
    out.push_str("</select>\n");
    let _ = writeln!(out, "<button id=\"{APPLY_OPERATION_ID}\">Apply</button>");

    let _ = writeln!(
        out,
        "<div id=\"{SHEET_CONTENT_ID}\">{}</div>",
        render_table(view)
    );
    out.push_str("</body>\n</html>\n");
    out
}
