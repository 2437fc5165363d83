//! Box-drawing table renderer for memory inspection output.
//!
//! Left-aligned columns with auto-width; long cells are truncated with an
//! ellipsis so fact content doesn't blow out the terminal.

use colored::Colorize;

/// Widest a single cell may render before truncation.
const MAX_CELL_WIDTH: usize = 60;

/// Collects headers and rows, renders a Unicode box-drawing table.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given column headers.
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Add a row. Missing cells render empty; extra cells are dropped.
    pub fn add_row(&mut self, cells: &[&str]) {
        let row = (0..self.headers.len())
            .map(|i| truncate(cells.get(i).copied().unwrap_or(""), MAX_CELL_WIDTH))
            .collect();
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
        widths
    }

    fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = widths.iter().map(|w| "\u{2500}".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(&mid.to_string()))
    }

    fn data_line(cells: &[String], widths: &[usize], bold: bool) -> String {
        let rendered: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let padded = format!("{cell}{}", " ".repeat(width - cell.chars().count()));
                if bold {
                    format!(" {} ", padded.bold())
                } else {
                    format!(" {padded} ")
                }
            })
            .collect();
        format!("\u{2502}{}\u{2502}", rendered.join("\u{2502}"))
    }

    /// Render to a string with box-drawing borders.
    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut lines = vec![Self::border(&widths, '\u{250c}', '\u{252c}', '\u{2510}')];
        lines.push(Self::data_line(&self.headers, &widths, true));
        lines.push(Self::border(&widths, '\u{251c}', '\u{253c}', '\u{2524}'));
        for row in &self.rows {
            lines.push(Self::data_line(row, &widths, false));
        }
        lines.push(Self::border(&widths, '\u{2514}', '\u{2534}', '\u{2518}'));
        lines.join("\n")
    }
}

/// Truncate to `max` characters, appending an ellipsis when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}\u{2026}")
}
