//! Portable `.invtpl` template archives.
//!
//! # Layout
//! A ZIP with two entries:
//! - `template.json`: the stored record shape, without its id
//! - `manifest.json`: format version, app version, export time and the
//!   SHA-256 of `template.json`
//!
//! # Export
//! Written to `<target>.tmp` and renamed over the target. On any failure the
//! temp file is removed and the target is left untouched.
//!
//! # Import
//! `format_version` must be 1 and the checksum must match. The returned
//! record has no id so it can be created in any store.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;
use zip::write::SimpleFileOptions;
use zip::CompressionMethod;

use crate::error::AppError;

use super::record::TemplateRecord;

/// Default extension for exported archives.
pub const ARCHIVE_EXTENSION: &str = "invtpl";

const TEMPLATE_JSON: &str = "template.json";
const MANIFEST_JSON: &str = "manifest.json";
const FORMAT_VERSION: u32 = 1;
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveManifest {
    pub format_version: u32,
    pub app_version: String,
    pub exported_at: String,
    /// Lowercase hex SHA-256 of `template.json`.
    pub sha256: String,
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", sha2::Sha256::digest(bytes))
}

/// Export `record` to `path`.
pub fn export(record: &TemplateRecord, path: &Path) -> Result<ArchiveManifest, AppError> {
    let file_name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let manifest = match write_archive(record, &tmp_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
    };

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        AppError::TemplateSave(format!("rename to final path failed: {e}"))
    })?;
    tracing::info!(path = %path.display(), name = %record.name, "template exported");
    Ok(manifest)
}

fn write_archive(record: &TemplateRecord, path: &Path) -> Result<ArchiveManifest, AppError> {
    let portable = TemplateRecord {
        id: None,
        ..record.clone()
    };
    let template_json = serde_json::to_vec_pretty(&portable)
        .map_err(|e| AppError::TemplateSave(format!("cannot serialize template: {e}")))?;
    let manifest = ArchiveManifest {
        format_version: FORMAT_VERSION,
        app_version: APP_VERSION.to_string(),
        exported_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        sha256: sha256_hex(&template_json),
    };
    let manifest_json = serde_json::to_vec_pretty(&manifest)
        .map_err(|e| AppError::TemplateSave(format!("cannot serialize manifest: {e}")))?;

    let file = std::fs::File::create(path)
        .map_err(|e| AppError::TemplateSave(format!("cannot create temp file: {e}")))?;
    let mut zip = zip::ZipWriter::new(file);
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in [(MANIFEST_JSON, &manifest_json), (TEMPLATE_JSON, &template_json)] {
        zip.start_file(name, opts)
            .map_err(|e| AppError::TemplateSave(format!("cannot create {name} entry: {e}")))?;
        zip.write_all(bytes)
            .map_err(|e| AppError::TemplateSave(format!("cannot write {name}: {e}")))?;
    }
    zip.finish()
        .map_err(|e| AppError::TemplateSave(format!("cannot finalize ZIP: {e}")))?;

    Ok(manifest)
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<Vec<u8>, AppError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| AppError::TemplateLoad(format!("{name} not found in archive: {e}")))?;
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::TemplateLoad(format!("cannot read {name}: {e}")))?;
    Ok(bytes)
}

/// Read an archive from `path` and return its record, without an id.
pub fn import(path: &Path) -> Result<TemplateRecord, AppError> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::TemplateLoad(format!("cannot open file: {e}")))?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::TemplateLoad(format!("not a valid ZIP archive: {e}")))?;

    let manifest: ArchiveManifest = serde_json::from_slice(&read_entry(&mut archive, MANIFEST_JSON)?)
        .map_err(|e| AppError::TemplateLoad(format!("cannot parse {MANIFEST_JSON}: {e}")))?;
    if manifest.format_version != FORMAT_VERSION {
        return Err(AppError::TemplateLoad(format!(
            "unsupported format version {}; only format version {FORMAT_VERSION} is supported",
            manifest.format_version
        )));
    }

    let template_json = read_entry(&mut archive, TEMPLATE_JSON)?;
    let actual = sha256_hex(&template_json);
    if !actual.eq_ignore_ascii_case(&manifest.sha256) {
        return Err(AppError::TemplateLoad(format!(
            "{TEMPLATE_JSON} checksum mismatch (expected {}, got {actual})",
            manifest.sha256
        )));
    }

    let record: TemplateRecord = serde_json::from_slice(&template_json)
        .map_err(|e| AppError::TemplateLoad(format!("cannot parse {TEMPLATE_JSON}: {e}")))?;
    tracing::info!(path = %path.display(), name = %record.name, "template imported");
    Ok(TemplateRecord { id: None, ..record })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanvasComponent, ComponentKind, Spacing, TemplateId};
    use pretty_assertions::assert_eq;

    fn record() -> TemplateRecord {
        TemplateRecord {
            id: Some(TemplateId::new("42")),
            name: "Portrait Session".to_string(),
            elements: vec![
                CanvasComponent::new(ComponentKind::CompanyInfo, 0.0, 0.0),
                CanvasComponent::new(ComponentKind::Notes, 10.0, 600.0),
            ],
            page_width: 559.37,
            page_height: 793.7,
            paper_size: "Custom".to_string(),
            margins: Spacing::uniform(8.0),
            created_at: Some("2026-03-01T09:00:00Z".to_string()),
        }
    }

    fn write_raw(path: &Path, manifest: &[u8], template: &[u8]) {
        let file = std::fs::File::create(path).expect("create");
        let mut zip = zip::ZipWriter::new(file);
        let opts = SimpleFileOptions::default();
        zip.start_file(MANIFEST_JSON, opts).expect("entry");
        zip.write_all(manifest).expect("write");
        zip.start_file(TEMPLATE_JSON, opts).expect("entry");
        zip.write_all(template).expect("write");
        zip.finish().expect("finish");
    }

    #[test]
    fn export_then_import_drops_only_the_id() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("portrait.invtpl");

        let original = record();
        let manifest = export(&original, &path).expect("export");
        assert_eq!(manifest.format_version, 1);
        assert!(!tmp.path().join("portrait.invtpl.tmp").exists());

        let imported = import(&path).expect("import");
        assert_eq!(
            imported,
            TemplateRecord {
                id: None,
                ..original
            }
        );
    }

    #[test]
    fn export_to_missing_directory_fails_cleanly() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("nope").join("x.invtpl");
        let err = export(&record(), &path).unwrap_err();
        assert!(matches!(err, AppError::TemplateSave(_)));
        assert!(!path.exists());
    }

    #[test]
    fn tampered_template_fails_checksum() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("tampered.invtpl");
        let manifest = serde_json::to_vec(&ArchiveManifest {
            format_version: 1,
            app_version: "0.0.0".to_string(),
            exported_at: "2026-01-01T00:00:00Z".to_string(),
            sha256: sha256_hex(b"something else"),
        })
        .expect("manifest");
        let template = serde_json::to_vec(&record()).expect("template");
        write_raw(&path, &manifest, &template);

        let err = import(&path).unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"), "{err}");
    }

    #[test]
    fn unknown_format_version_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("future.invtpl");
        let template = serde_json::to_vec(&record()).expect("template");
        let manifest = serde_json::to_vec(&ArchiveManifest {
            format_version: 2,
            app_version: "9.0.0".to_string(),
            exported_at: "2030-01-01T00:00:00Z".to_string(),
            sha256: sha256_hex(&template),
        })
        .expect("manifest");
        write_raw(&path, &manifest, &template);

        let err = import(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported format version 2"), "{err}");
    }

    #[test]
    fn non_zip_file_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("plain.invtpl");
        std::fs::write(&path, "not a zip").expect("write");
        assert!(matches!(import(&path), Err(AppError::TemplateLoad(_))));
    }
}
