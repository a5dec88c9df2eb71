//! `aliscan snapshot`: automatic snapshot policy coverage for ECS disks.
//!
//! A multi-section report: API smoke test, the region's policy list, one
//! line per instance with its policy classification, and summary counts.
//! Credentials come from the environment only.

use std::collections::HashMap;

use clap::Args as ClapArgs;
use tracing::warn;

use crate::credentials::Credentials;
use crate::ecs::{AutoSnapshotPolicy, Disk, EcsClient};

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Region to audit
    #[arg(long, env = "ALIBABA_CLOUD_REGION_ID", default_value = "cn-hangzhou")]
    pub region: String,

    /// Print only instances whose disks lack a policy
    #[arg(long, env = "ONLY_WITHOUT_POLICY", default_value_t = false)]
    pub only_without_policy: bool,

    /// Print every disk while scanning
    #[arg(long, env = "SNAPSHOT_DEBUG", default_value_t = false)]
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyStatus {
    WithPolicy,
    WithoutPolicy,
    NoDisks,
}

/// An instance is protected when at least one disk carries a policy.
pub fn classify(disks: &[Disk]) -> PolicyStatus {
    if disks.is_empty() {
        return PolicyStatus::NoDisks;
    }
    if disks
        .iter()
        .any(|disk| !disk.auto_snapshot_policy_id.is_empty())
    {
        PolicyStatus::WithPolicy
    } else {
        PolicyStatus::WithoutPolicy
    }
}

#[derive(Debug, Default)]
struct Summary {
    with_policy: usize,
    without_policy: usize,
    no_disks: usize,
    errors: usize,
}

impl Summary {
    fn count(&mut self, status: PolicyStatus) {
        match status {
            PolicyStatus::WithPolicy => self.with_policy += 1,
            PolicyStatus::WithoutPolicy => self.without_policy += 1,
            PolicyStatus::NoDisks => self.no_disks += 1,
        }
    }
}

pub async fn run(args: Args) -> miette::Result<()> {
    let credentials = Credentials::from_env()?;
    let ecs = EcsClient::new(&args.region, credentials.clone());

    println!("== snapshot policy report: {} ==", args.region);
    println!("access key: {}", credentials.masked_key_id());
    println!();

    // Smoke test first; a dead endpoint means nothing below can work.
    println!("-- api smoke test --");
    match ecs.regions().await {
        Ok(regions) => println!("ok: endpoint reachable, {} regions visible", regions.len()),
        Err(error) => {
            println!("failed: {error}");
            return Err(error.into());
        }
    }
    println!();

    println!("-- auto snapshot policies --");
    let policies: HashMap<String, AutoSnapshotPolicy> = match ecs.auto_snapshot_policies().await {
        Ok(list) => {
            if list.is_empty() {
                println!("no auto snapshot policies defined in {}", args.region);
            }
            for policy in &list {
                println!(
                    "{:<20} {:<24} retention={:<8} bound-disks={}",
                    policy.auto_snapshot_policy_id,
                    policy.auto_snapshot_policy_name,
                    retention_label(policy.retention_days),
                    policy.disk_nums
                );
            }
            list.into_iter()
                .map(|policy| (policy.auto_snapshot_policy_id.clone(), policy))
                .collect()
        }
        Err(error) => {
            warn!(%error, "policy listing failed");
            println!("skipped: {error}");
            HashMap::new()
        }
    };
    println!();

    println!("-- instances --");
    let instances = ecs.instances().await?;
    if instances.is_empty() {
        println!("no ECS instances in {}", args.region);
    }

    let mut summary = Summary::default();
    for instance in &instances {
        let disks = match ecs.disks_for_instance(&instance.instance_id).await {
            Ok(disks) => disks,
            Err(error) => {
                summary.errors += 1;
                println!(
                    "{:<22} error: disk listing failed: {error}",
                    instance.instance_id
                );
                continue;
            }
        };

        let status = classify(&disks);
        summary.count(status);

        if args.only_without_policy && status != PolicyStatus::WithoutPolicy {
            continue;
        }

        let name = if instance.instance_name.is_empty() {
            "-"
        } else {
            &instance.instance_name
        };
        println!(
            "{:<22} {:<24} {}",
            instance.instance_id,
            name,
            status_label(status, &disks, &policies)
        );

        if args.debug {
            for disk in &disks {
                println!(
                    "    {:<22} {:<8} {:<12} {:>5} GiB  {}",
                    disk.disk_id,
                    disk.disk_type,
                    disk.category,
                    disk.size,
                    bound_policy_label(disk, &policies)
                        .unwrap_or_else(|| "no policy".to_string())
                );
            }
        }
    }
    println!();

    println!("-- summary --");
    println!("instances with policy:    {}", summary.with_policy);
    println!("instances without policy: {}", summary.without_policy);
    println!("instances with no disks:  {}", summary.no_disks);
    if summary.errors > 0 {
        println!("instances skipped on error: {}", summary.errors);
    }

    Ok(())
}

fn retention_label(retention_days: i64) -> String {
    if retention_days < 0 {
        "forever".to_string()
    } else {
        format!("{retention_days}d")
    }
}

/// Policy name plus id when the id resolves, bare id otherwise, `None` for
/// an unbound disk.
fn bound_policy_label(
    disk: &Disk,
    policies: &HashMap<String, AutoSnapshotPolicy>,
) -> Option<String> {
    if disk.auto_snapshot_policy_id.is_empty() {
        return None;
    }
    Some(match policies.get(&disk.auto_snapshot_policy_id) {
        Some(policy) if !policy.auto_snapshot_policy_name.is_empty() => format!(
            "{} ({})",
            policy.auto_snapshot_policy_name, disk.auto_snapshot_policy_id
        ),
        _ => disk.auto_snapshot_policy_id.clone(),
    })
}

fn status_label(
    status: PolicyStatus,
    disks: &[Disk],
    policies: &HashMap<String, AutoSnapshotPolicy>,
) -> String {
    match status {
        PolicyStatus::NoDisks => "no disks".to_string(),
        PolicyStatus::WithoutPolicy => "no policy".to_string(),
        PolicyStatus::WithPolicy => {
            let mut labels: Vec<String> = disks
                .iter()
                .filter_map(|disk| bound_policy_label(disk, policies))
                .collect();
            labels.sort();
            labels.dedup();
            format!("policy: {}", labels.join(", "))
        }
    }
}
