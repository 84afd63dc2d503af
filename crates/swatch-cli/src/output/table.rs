use swatch_core::color::parse_hex;

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render a simple aligned table for string rows.
///
/// With `color`, `#RRGGBB` cells are drawn in their own color.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
                .max(4)
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(header, width)| format_cell(&truncate_text(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join("  ");

    let divider = "-".repeat(header_line.chars().count());

    let row_lines = rows
        .iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(index, width)| {
                    let value = row.get(index).map_or("-", String::as_str);
                    let truncated = truncate_text(value, *width);
                    let padded = format_cell(&truncated, *width, looks_numeric(&truncated));
                    if options.color {
                        colorize_hex(&padded)
                    } else {
                        padded
                    }
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>();

    let mut lines = Vec::with_capacity(2 + row_lines.len());
    lines.push(header_line.trim_end().to_string());
    lines.push(divider);
    lines.extend(row_lines);
    lines.join("\n")
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let candidate = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(4))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);

        let Some(idx) = candidate else {
            break;
        };

        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | ','))
}

fn format_cell(value: &str, width: usize, numeric: bool) -> String {
    let pad = width.saturating_sub(value.chars().count());
    if numeric {
        format!("{}{}", " ".repeat(pad), value)
    } else {
        format!("{}{}", value, " ".repeat(pad))
    }
}

/// Paint a padded `#RRGGBB` cell in its own color. Padding stays outside the
/// escape codes so alignment is unaffected.
fn colorize_hex(padded: &str) -> String {
    let value = padded.trim_end();
    if value.len() != 7 || !value.starts_with('#') {
        return padded.to_string();
    }
    let Ok([r, g, b]) = parse_hex(value) else {
        return padded.to_string();
    };
    let pad = &padded[value.len()..];
    format!("\u{1b}[38;2;{r};{g};{b}m{value}\u{1b}[0m{pad}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_cells_are_colored_without_moving_padding() {
        assert_eq!(
            colorize_hex("#FF0000   "),
            "\u{1b}[38;2;255;0;0m#FF0000\u{1b}[0m   "
        );
        assert_eq!(colorize_hex("Cadmium "), "Cadmium ");
        assert_eq!(colorize_hex("#GGGGGG"), "#GGGGGG");
    }

    #[test]
    fn narrow_terminal_truncates_widest_column() {
        let headers = ["id", "color_name"];
        let rows = vec![vec!["mkr-1".to_string(), "x".repeat(60)]];
        let table = render_entity_table(
            &headers,
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        let row = table.lines().nth(2).unwrap();
        assert_eq!(row.chars().count(), 40);
        assert!(row.ends_with('…'));
    }
}
