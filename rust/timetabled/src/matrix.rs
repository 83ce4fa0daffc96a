use serde::Serialize;

use crate::classify::classify_day;
use crate::electives::ElectiveResolver;
use crate::labels::LabelDescriptor;
use crate::slot::{Day, TimetableGrid};

/// Format-neutral table handed to the encoders: a header row plus one row per
/// display period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMatrix {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportMatrix {
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Header followed by body rows.
    pub fn lines(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.lines().nth(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}

pub fn build_matrix(
    grid: &TimetableGrid,
    labels: &[LabelDescriptor],
    working_days: usize,
    day_names: &[String],
    resolver: &ElectiveResolver<'_>,
) -> ExportMatrix {
    let day_count = working_days.min(day_names.len());
    let mut header = Vec::with_capacity(day_count + 1);
    header.push("Time".to_string());
    header.extend(day_names.iter().take(day_count).cloned());

    let empty: Day = Vec::new();
    let columns: Vec<Vec<String>> = (0..day_count)
        .map(|d| {
            let day = grid.get(d).unwrap_or(&empty);
            classify_day(labels, day, resolver)
                .iter()
                .map(|c| c.export_text())
                .collect()
        })
        .collect();

    let rows = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mut row = Vec::with_capacity(day_count + 1);
            row.push(label.original_label.clone());
            row.extend(columns.iter().map(|col| col[i].clone()));
            row
        })
        .collect();

    ExportMatrix { header, rows }
}

/// Collapses each run of non-word characters to `_`; leading and trailing
/// runs are kept.
pub fn filename_stem(identifier: &str) -> String {
    let mut out = String::with_capacity(identifier.len());
    let mut in_run = false;
    for c in identifier.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('_');
            in_run = true;
        }
    }
    if out.is_empty() {
        return "timetable".to_string();
    }
    out
}

pub fn export_filename(identifier: &str, ext: &str) -> String {
    format!("{}_timetable.{}", filename_stem(identifier), ext)
}
