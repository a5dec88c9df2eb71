//! Serializable model and file writer for the backup audit report.

use std::path::Path;

use miette::IntoDiagnostic as _;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BackupReport {
    pub generated_at_utc: String,
    pub lookback_hours: i64,
    /// Masked; the report never contains the full AccessKey id.
    pub account_access_key_id: String,
    pub regions_count: usize,
    pub regions_with_recent_backups: usize,
    pub total_recent_snapshots: usize,
    pub entries: Vec<RegionEntry>,
}

#[derive(Debug, Serialize)]
pub struct RegionEntry {
    pub region: String,
    pub snapshots: Vec<SnapshotRecord>,
    pub backup_verification: Verification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotRecord {
    pub snapshot_id: String,
    pub status: String,
    pub created_utc: String,
    pub source_disk_id: String,
    pub source_disk_type: String,
    pub progress: String,
    pub usage: String,
    pub source_disk_size_gb: Option<i64>,
    pub is_recent: bool,
    /// First attached instance, when any.
    pub instance_id: Option<String>,
    pub instance_name: Option<String>,
    pub attached_instance_ids: Vec<String>,
    pub attached_instance_names: Vec<Option<String>>,
}

#[derive(Debug, Serialize)]
pub struct Verification {
    pub result: VerificationResult,
    pub recent_snapshot_count: usize,
    pub cutoff_utc: String,
    pub lookback_hours: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationResult {
    Success,
    Fail,
}

pub fn save(report: &BackupReport, path: &Path) -> miette::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
    }

    let contents = serde_json::to_string_pretty(report).into_diagnostic()?;
    std::fs::write(path, contents).into_diagnostic()?;

    Ok(())
}
