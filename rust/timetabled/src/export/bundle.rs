use anyhow::Context;
use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::Artifact;

pub const MANIFEST_ENTRY: &str = "manifest.json";
pub const BUNDLE_FORMAT: &str = "timetable-export-v1";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub name: String,
    pub bytes: usize,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub struct BundleSummary {
    pub export_id: String,
    pub entries: Vec<BundleEntry>,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Zips `artifacts` together with a manifest listing each file's size and checksum.
pub fn encode_bundle(
    identifier: &str,
    artifacts: &[Artifact],
) -> anyhow::Result<(Vec<u8>, BundleSummary)> {
    let entries: Vec<BundleEntry> = artifacts
        .iter()
        .map(|a| BundleEntry {
            name: a.file_name.clone(),
            bytes: a.bytes.len(),
            sha256: sha256_hex(&a.bytes),
        })
        .collect();
    let export_id = uuid::Uuid::new_v4().to_string();
    let manifest = json!({
        "format": BUNDLE_FORMAT,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportId": export_id,
        "exportedAt": chrono::Local::now().to_rfc3339(),
        "identifier": identifier,
        "files": entries,
    });

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    for a in artifacts {
        zip.start_file(a.file_name.as_str(), opts)
            .with_context(|| format!("failed to start entry {}", a.file_name))?;
        zip.write_all(&a.bytes)
            .with_context(|| format!("failed to write entry {}", a.file_name))?;
    }

    let cursor = zip.finish().context("failed to finalize zip bundle")?;
    Ok((cursor.into_inner(), BundleSummary { export_id, entries }))
}
