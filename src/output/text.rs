//! Human-readable terminal output.
//!
//! Prints the column summary followed by aligned tables for every computed
//! artifact. Colors are applied through `yansi` and can be switched off per
//! formatter (and globally via `yansi::disable()`).

use std::fmt::Display;
use std::io::{self, Write};

use yansi::{Paint, Style};

use crate::analysis::AnalysisReport;

/// Message printed when the selected column holds no repeated value.
pub const NO_DUPLICATES_MESSAGE: &str = "No duplicate values found in the selected column.";

const HEADING: Style = Style::new().bold().underline();
const LABEL: Style = Style::new().cyan();
const NUMBER: Style = Style::new().bold();
const SUCCESS: Style = Style::new().green();

/// Text output formatter.
pub struct TextOutput<'a> {
    report: &'a AnalysisReport,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a new text formatter with colors enabled.
    #[must_use]
    pub fn new(report: &'a AnalysisReport) -> Self {
        Self {
            report,
            color: true,
        }
    }

    /// Enable or disable colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Write the full text report.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let report = self.report;
        let stats = &report.statistics;

        writeln!(writer, "{}", self.paint("Summary", HEADING))?;
        self.write_stat(&mut writer, "Total values in column", stats.total)?;
        self.write_stat(&mut writer, "Unique values", stats.unique)?;
        self.write_stat(
            &mut writer,
            "Duplicated values (occurred more than once)",
            stats.duplicated,
        )?;
        self.write_stat(&mut writer, "Null values", stats.nulls)?;

        if !report.has_duplicates() {
            writeln!(writer)?;
            writeln!(writer, "{}", self.paint(NO_DUPLICATES_MESSAGE, SUCCESS))?;
            return Ok(());
        }

        writeln!(writer)?;
        writeln!(writer, "{}", self.paint("Duplicated Value Details", HEADING))?;
        let rows: Vec<Vec<String>> = report
            .duplicate_values
            .iter()
            .map(|d| vec![d.value.to_string(), d.count.to_string()])
            .collect();
        self.write_table(&mut writer, &[report.column.as_str(), "Count"], &rows)?;

        if let Some(entries) = report.root_causes.as_ref().filter(|e| !e.is_empty()) {
            writeln!(writer)?;
            writeln!(writer, "{}", self.paint("Root Cause with Actual Values", HEADING))?;
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|entry| {
                    let values = if entry.conflicting_values.is_empty() {
                        "None".to_string()
                    } else {
                        entry
                            .conflicting_values
                            .iter()
                            .map(|(column, values)| {
                                let shown: Vec<String> =
                                    values.iter().map(ToString::to_string).collect();
                                format!("{column}: [{}]", shown.join(", "))
                            })
                            .collect::<Vec<_>>()
                            .join("; ")
                    };
                    vec![
                        entry.key.to_string(),
                        entry.conflicting_columns_label(),
                        values,
                    ]
                })
                .collect();
            self.write_table(
                &mut writer,
                &[
                    report.column.as_str(),
                    "Conflicting_Columns",
                    "Conflicting_Values",
                ],
                &rows,
            )?;
        }

        if let Some(entries) = report.conflict_summary.as_ref().filter(|e| !e.is_empty()) {
            writeln!(writer)?;
            writeln!(
                writer,
                "{}",
                self.paint("Grouped Conflicting Columns Summary", HEADING)
            )?;
            let rows: Vec<Vec<String>> = entries
                .iter()
                .map(|e| {
                    vec![
                        e.columns.label(),
                        e.group_count.to_string(),
                        e.row_count.to_string(),
                    ]
                })
                .collect();
            self.write_table(
                &mut writer,
                &[
                    "Conflicting_Columns",
                    "Affected_Duplicate_Groups",
                    "Affected_Rows",
                ],
                &rows,
            )?;
        }

        Ok(())
    }

    /// Render the full text report into a string.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn paint<T: Display>(&self, text: T, style: Style) -> String {
        if self.color {
            text.paint(style).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_stat<W: Write>(&self, writer: &mut W, label: &str, value: usize) -> io::Result<()> {
        writeln!(
            writer,
            "  {}: {}",
            self.paint(label, LABEL),
            self.paint(value, NUMBER)
        )
    }

    /// Write rows as left-aligned columns separated by two spaces.
    fn write_table<W: Write>(
        &self,
        writer: &mut W,
        headers: &[&str],
        rows: &[Vec<String>],
    ) -> io::Result<()> {
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let header_line = pad_row(headers.iter().copied(), &widths);
        writeln!(writer, "  {}", self.paint(header_line, NUMBER))?;
        for row in rows {
            writeln!(writer, "  {}", pad_row(row.iter().map(String::as_str), &widths))?;
        }
        Ok(())
    }
}

fn pad_row<'s>(cells: impl Iterator<Item = &'s str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}
