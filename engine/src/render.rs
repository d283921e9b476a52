//! FILENAME: engine/src/render.rs
//! Plain-text table rendering.

use std::fmt;

use crate::config::RenderConfig;
use crate::frame::DataFrame;

impl DataFrame {
    /// Renders a header line, a rule line and one line per row. Each column
    /// is as wide as its name or its longest cell, whichever is longer.
    /// Lines carry no trailing whitespace and each ends with a newline.
    pub fn render_with(&self, config: &RenderConfig) -> String {
        if self.column_count() == 0 {
            return config.empty_frame_text.clone();
        }

        let names = self.column_names();
        let cells: Vec<Vec<String>> = self
            .columns()
            .map(|series| {
                series
                    .iter()
                    .map(|value| {
                        if value.is_absent() {
                            config.absent_placeholder.clone()
                        } else {
                            value.display_value()
                        }
                    })
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = names
            .iter()
            .zip(&cells)
            .map(|(name, column)| {
                column
                    .iter()
                    .map(|cell| cell.chars().count())
                    .fold(name.chars().count(), usize::max)
            })
            .collect();

        let separator = config.column_separator.as_str();
        let mut out = String::new();
        push_line(&mut out, names.iter().copied(), &widths, separator);
        let rules: Vec<String> = widths
            .iter()
            .map(|&width| config.rule_char.to_string().repeat(width))
            .collect();
        push_line(&mut out, rules.iter().map(String::as_str), &widths, separator);
        for row in 0..self.size() {
            push_line(
                &mut out,
                cells.iter().map(|column| column[row].as_str()),
                &widths,
                separator,
            );
        }
        out
    }
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize], separator: &str) {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
        .collect::<Vec<_>>()
        .join(separator);
    out.push_str(line.trim_end());
    out.push('\n');
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(&RenderConfig::default()))
    }
}
