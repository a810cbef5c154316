//! Shared import loop for YAML files holding a list of rows

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use super::reconcile::{Reconcile, Reconciler};
use super::ImportReport;

pub(crate) fn default_true() -> bool {
    true
}

/// A YAML row that knows its key and how to become a reconciler input
pub(crate) trait ImportRow: DeserializeOwned {
    type Record: Reconcile;

    fn key(&self) -> Option<&str>;
    fn label(&self) -> Option<&str>;
    fn into_input(self, media_prefix: &str) -> <Self::Record as Reconcile>::Input;
}

/// Rows under `key` in a YAML file, each imported independently.
///
/// A missing file is a skipped report. A file that cannot be read or parsed
/// is a single failure for that file.
pub(crate) async fn import_yaml_rows<R: ImportRow>(
    reconciler: &Reconciler,
    path: &Path,
    key: &str,
    media_prefix: &str,
) -> ImportReport {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let rows = match read_rows(path, key).await {
        Some(Ok(rows)) => rows,
        Some(Err(err)) => {
            let mut report = ImportReport::default();
            report.fail(file_name, err);
            return report;
        }
        None => {
            tracing::info!("{} not found, skipping", path.display());
            return ImportReport::skipped();
        }
    };

    let kind = <R::Record as Reconcile>::KIND;
    let mut report = ImportReport::default();

    for (index, value) in rows.into_iter().enumerate() {
        let row: R = match serde_yaml::from_value(value) {
            Ok(row) => row,
            Err(err) => {
                report.fail(format!("{} row {}", file_name, index + 1), err);
                continue;
            }
        };

        let label = row
            .label()
            .filter(|l| !l.trim().is_empty())
            .or(row.key())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} row {}", file_name, index + 1));
        let key = row.key().map(str::to_string);
        let input = row.into_input(media_prefix);

        match reconciler.upsert::<R::Record>(key.as_deref(), input).await {
            Ok(upserted) => {
                report.record(upserted.created, upserted.changed);
                let action = match (upserted.created, upserted.changed) {
                    (true, _) => "Created",
                    (false, true) => "Updated",
                    (false, false) => "Unchanged",
                };
                tracing::info!("{} {}: {}", action, kind, label);
            }
            Err(err) => report.fail(label, err),
        }
    }

    tracing::info!(
        "Imported {} {} row(s) from {}",
        report.imported,
        kind,
        file_name
    );
    report
}

/// Read the sequence under `key`. `None` when the file does not exist; the
/// inner error describes a file that could not be read or parsed.
async fn read_rows(path: &Path, key: &str) -> Option<Result<Vec<Value>, String>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => return Some(Err(format!("Failed to read file: {}", err))),
    };

    let document: Value = match serde_yaml::from_str(&text) {
        Ok(document) => document,
        Err(err) => return Some(Err(format!("Invalid YAML: {}", err))),
    };

    match document.get(key) {
        None | Some(Value::Null) => Some(Ok(Vec::new())),
        Some(Value::Sequence(rows)) => Some(Ok(rows.clone())),
        Some(_) => Some(Err(format!("'{}' must be a list", key))),
    }
}
