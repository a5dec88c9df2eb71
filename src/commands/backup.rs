//! `aliscan backup`: recent-snapshot audit across regions.
//!
//! Walks every snapshot in each requested region, flags the ones created
//! inside the lookback window, resolves which instances the source disks
//! are attached to, and writes the whole thing out as a JSON report. A
//! region without a single recent snapshot fails its verification.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use clap::Args as ClapArgs;
use tracing::debug;

use crate::credentials::Credentials;
use crate::ecs::{Disk, EcsClient, Snapshot};
use crate::report::{
    self, BackupReport, RegionEntry, SnapshotRecord, Verification, VerificationResult,
};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Regions to audit
    #[arg(
        short,
        long,
        num_args = 1..,
        default_values_t = [String::from("cn-hangzhou"), String::from("cn-shanghai")]
    )]
    pub regions: Vec<String>,

    /// Lookback window in hours
    #[arg(short, long, env = "LOOKBACK_HOURS", default_value_t = 24)]
    pub lookback_hours: i64,

    /// Output JSON file path (default: ./backup_report_<utc-timestamp>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn run(args: Args) -> miette::Result<()> {
    let credentials = Credentials::from_env()?;

    let now = Utc::now();
    let cutoff = now - Duration::hours(args.lookback_hours);

    let mut entries = Vec::with_capacity(args.regions.len());
    for region in &args.regions {
        println!("checking region {region}...");
        entries.push(audit_region(region, &credentials, cutoff, args.lookback_hours).await);
    }

    let report = assemble_report(
        entries,
        args.lookback_hours,
        credentials.masked_key_id(),
        format_utc(now),
    );

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "backup_report_{}.json",
            now.format("%Y%m%d_%H%M%SZ")
        ))
    });
    report::save(&report, &output)?;

    println!(
        "report saved: {} ({} regions, {} recent snapshots)",
        output.display(),
        report.regions_count,
        report.total_recent_snapshots
    );

    Ok(())
}

async fn audit_region(
    region: &str,
    credentials: &Credentials,
    cutoff: DateTime<Utc>,
    lookback_hours: i64,
) -> RegionEntry {
    let ecs = EcsClient::new(region, credentials.clone());

    let snapshots = match ecs.snapshots().await {
        Ok(snapshots) => snapshots,
        Err(error) => {
            println!("  {region}: snapshot listing failed: {error}");
            return RegionEntry {
                region: region.to_string(),
                snapshots: Vec::new(),
                backup_verification: verification(&[], cutoff, lookback_hours),
                error: Some(error.to_string()),
            };
        }
    };

    let mut attachment_cache: HashMap<String, Vec<String>> = HashMap::new();
    let mut name_cache: HashMap<String, Option<String>> = HashMap::new();

    let mut records = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        let attached_ids = if snapshot.source_disk_id.is_empty() {
            Vec::new()
        } else {
            attached_instance_ids(&ecs, &mut attachment_cache, &snapshot.source_disk_id).await
        };

        let mut attached_names = Vec::with_capacity(attached_ids.len());
        for id in &attached_ids {
            attached_names.push(instance_name(&ecs, &mut name_cache, id).await);
        }

        records.push(build_record(snapshot, cutoff, attached_ids, attached_names));
    }

    let backup_verification = verification(&records, cutoff, lookback_hours);
    RegionEntry {
        region: region.to_string(),
        snapshots: records,
        backup_verification,
        error: None,
    }
}

/// Which instances the disk is attached to. Lookup failures resolve to an
/// empty list, logged at debug level only.
async fn attached_instance_ids(
    ecs: &EcsClient,
    cache: &mut HashMap<String, Vec<String>>,
    disk_id: &str,
) -> Vec<String> {
    if let Some(ids) = cache.get(disk_id) {
        return ids.clone();
    }

    let ids = match ecs.disks_by_ids(&[disk_id.to_string()]).await {
        Ok(disks) => disks.first().map(attachment_ids).unwrap_or_default(),
        Err(error) => {
            debug!(%error, disk_id, "disk attachment lookup failed");
            Vec::new()
        }
    };

    cache.insert(disk_id.to_string(), ids.clone());
    ids
}

/// Deduplicated, sorted attachment ids so the primary choice is stable.
/// Falls back to the disk's own `InstanceId` field when the attachment
/// list is empty.
fn attachment_ids(disk: &Disk) -> Vec<String> {
    let mut ids: Vec<String> = disk
        .attachments
        .attachment
        .iter()
        .map(|attachment| attachment.instance_id.clone())
        .filter(|id| !id.is_empty())
        .collect();

    if ids.is_empty() && !disk.instance_id.is_empty() {
        ids.push(disk.instance_id.clone());
    }

    ids.sort();
    ids.dedup();
    ids
}

async fn instance_name(
    ecs: &EcsClient,
    cache: &mut HashMap<String, Option<String>>,
    instance_id: &str,
) -> Option<String> {
    if let Some(name) = cache.get(instance_id) {
        return name.clone();
    }

    let name = match ecs.instances_by_ids(&[instance_id.to_string()]).await {
        Ok(instances) => instances
            .first()
            .map(|instance| instance.instance_name.clone())
            .filter(|name| !name.is_empty()),
        Err(error) => {
            debug!(%error, instance_id, "instance name lookup failed");
            None
        }
    };

    cache.insert(instance_id.to_string(), name.clone());
    name
}

fn build_record(
    snapshot: Snapshot,
    cutoff: DateTime<Utc>,
    attached_instance_ids: Vec<String>,
    attached_instance_names: Vec<Option<String>>,
) -> SnapshotRecord {
    let is_recent = is_recent(&snapshot.creation_time, cutoff);

    SnapshotRecord {
        snapshot_id: snapshot.snapshot_id,
        status: snapshot.status,
        created_utc: snapshot.creation_time,
        source_disk_id: snapshot.source_disk_id,
        source_disk_type: snapshot.source_disk_type,
        progress: snapshot.progress,
        usage: snapshot.usage,
        source_disk_size_gb: snapshot.source_disk_size,
        is_recent,
        instance_id: attached_instance_ids.first().cloned(),
        instance_name: attached_instance_names.first().cloned().flatten(),
        attached_instance_ids,
        attached_instance_names,
    }
}

/// Unparseable creation times count as not recent.
fn is_recent(creation_time: &str, cutoff: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(creation_time)
        .map(|created| created.with_timezone(&Utc) > cutoff)
        .unwrap_or(false)
}

fn verification(
    records: &[SnapshotRecord],
    cutoff: DateTime<Utc>,
    lookback_hours: i64,
) -> Verification {
    let recent_snapshot_count = records.iter().filter(|record| record.is_recent).count();

    Verification {
        result: if recent_snapshot_count > 0 {
            VerificationResult::Success
        } else {
            VerificationResult::Fail
        },
        recent_snapshot_count,
        cutoff_utc: format_utc(cutoff),
        lookback_hours,
    }
}

fn assemble_report(
    entries: Vec<RegionEntry>,
    lookback_hours: i64,
    masked_key_id: String,
    generated_at_utc: String,
) -> BackupReport {
    let total_recent_snapshots = entries
        .iter()
        .map(|entry| entry.backup_verification.recent_snapshot_count)
        .sum();
    let regions_with_recent_backups = entries
        .iter()
        .filter(|entry| entry.backup_verification.result == VerificationResult::Success)
        .count();

    BackupReport {
        generated_at_utc,
        lookback_hours,
        account_access_key_id: masked_key_id,
        regions_count: entries.len(),
        regions_with_recent_backups,
        total_recent_snapshots,
        entries,
    }
}

fn format_utc(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
