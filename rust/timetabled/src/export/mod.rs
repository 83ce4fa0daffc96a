//! Encoders that turn an [`ExportMatrix`] into downloadable artifacts.

pub mod bundle;
pub mod pdf;
pub mod text;
pub mod xlsx;

use anyhow::Context;
use std::path::Path;

use crate::matrix::{export_filename, ExportMatrix};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Xlsx,
    Pdf,
    Bundle,
}

impl ExportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" | "txt" => Some(Self::Text),
            "xlsx" => Some(Self::Xlsx),
            "pdf" => Some(Self::Pdf),
            "bundle" | "zip" => Some(Self::Bundle),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Xlsx => "xlsx",
            Self::Pdf => "pdf",
            Self::Bundle => "zip",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn document_title(identifier: &str) -> String {
    match identifier.trim() {
        "" => "Timetable".to_string(),
        id => format!("{} Timetable", id),
    }
}

/// Encodes `matrix` in `format`. A bundle carries the three document formats.
pub fn render_artifact(
    format: ExportFormat,
    matrix: &ExportMatrix,
    identifier: &str,
    settings: &Settings,
) -> anyhow::Result<Artifact> {
    let bytes = match format {
        ExportFormat::Text => text::encode_text(matrix, settings.text_column_gap).into_bytes(),
        ExportFormat::Xlsx => xlsx::encode_xlsx(matrix)?,
        ExportFormat::Pdf => pdf::encode_pdf(matrix, &document_title(identifier), &settings.pdf),
        ExportFormat::Bundle => {
            let parts = [ExportFormat::Xlsx, ExportFormat::Text, ExportFormat::Pdf]
                .into_iter()
                .map(|f| render_artifact(f, matrix, identifier, settings))
                .collect::<anyhow::Result<Vec<_>>>()?;
            let (bytes, summary) = bundle::encode_bundle(identifier, &parts)?;
            tracing::debug!(export_id = %summary.export_id, entries = summary.entries.len(), "bundle encoded");
            bytes
        }
    };
    Ok(Artifact {
        file_name: export_filename(identifier, format.extension()),
        bytes,
    })
}

pub fn write_artifact(path: &Path, artifact: &Artifact) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.to_string_lossy()))?;
    }
    std::fs::write(path, &artifact.bytes)
        .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;
    tracing::info!(path = %path.to_string_lossy(), bytes = artifact.bytes.len(), "export written");
    Ok(())
}
