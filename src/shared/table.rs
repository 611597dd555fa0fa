//! Table and text layout helpers used by the CLI.
//! Widths are measured on visible characters so coloured cells line up.

/// Render a text table. Column widths come from the widest cell; when
/// `max_width` is given the last column is shortened to fit it.
pub fn render_table(
    headers: &[String],
    rows: &[Vec<String>],
    max_width: Option<usize>,
) -> String {
    if headers.is_empty() {
        return String::new();
    }
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| display_len(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(cols) {
            widths[i] = widths[i].max(display_len(cell));
        }
    }

    let last_budget = max_width.map(|max| {
        let fixed: usize = widths[..cols - 1].iter().sum::<usize>() + 3 * (cols - 1);
        max.saturating_sub(fixed).max(8)
    });
    if let Some(budget) = last_budget {
        widths[cols - 1] = widths[cols - 1].min(budget);
    }

    let mut out = String::new();
    let header_line = format_row(headers, &widths);
    out.push_str(&header_line);
    out.push('\n');
    out.push_str(&"=".repeat(display_len(&header_line)));
    for row in rows {
        out.push('\n');
        out.push_str(format_row(row, &widths).trim_end());
    }
    out
}

fn format_row(row: &[String], widths: &[usize]) -> String {
    let last = widths.len().saturating_sub(1);
    let mut parts: Vec<String> = Vec::new();
    for (i, (cell, width)) in row.iter().zip(widths.iter()).enumerate() {
        let plain_len = display_len(cell);
        // Coloured cells are never cut so their escape codes stay balanced.
        if i == last && plain_len > *width && !cell.contains('\x1b') {
            parts.push(truncate_with_ellipsis(cell, *width));
        } else {
            parts.push(pad_field(cell, *width, plain_len));
        }
    }
    parts.join(" | ")
}

/// Right-pad a field based on visible length.
pub fn pad_field(display: &str, target: usize, plain_len: usize) -> String {
    let mut out = display.to_string();
    out.push_str(&" ".repeat(target.saturating_sub(plain_len)));
    out
}

/// Truncate text to a width, appending an ellipsis when needed.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width == 1 {
        return "…".to_string();
    }
    let mut out = text.chars().take(max_width - 1).collect::<String>();
    out.push('…');
    out
}

/// Visible length of a string, skipping ANSI escape sequences.
pub fn display_len(s: &str) -> usize {
    let mut len = 0;
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
            continue;
        }
        len += 1;
    }
    len
}
