//! `aliscan agent`: Security Center agent presence per ECS asset.
//!
//! The asset list comes from the Security Center inventory; instance names
//! come from ECS and are joined by instance id, with the inventory's own
//! name (or a placeholder) as fallback. With `--check-cloud-assistant` the
//! Cloud Assistant heartbeat is joined in as well.

use std::collections::HashMap;

use clap::Args as ClapArgs;
use tracing::warn;

use crate::credentials::Credentials;
use crate::ecs::{CloudAssistantStatus, EcsClient};
use crate::sas::{Asset, SasClient};

const NAME_FALLBACK: &str = "(unknown)";

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Region whose assets to report, e.g. cn-hangzhou
    #[arg(long)]
    pub region: String,

    /// AccessKey id (falls back to ALIBABA_CLOUD_ACCESS_KEY_ID)
    #[arg(long)]
    pub access_key_id: Option<String>,

    /// AccessKey secret (falls back to ALIBABA_CLOUD_ACCESS_KEY_SECRET)
    #[arg(long)]
    pub access_key_secret: Option<String>,

    /// Report a single instance instead of the whole inventory
    #[arg(long)]
    pub instance_id: Option<String>,

    /// Also query the Cloud Assistant heartbeat for each asset
    #[arg(long, default_value_t = false)]
    pub check_cloud_assistant: bool,
}

pub async fn run(args: Args) -> miette::Result<()> {
    let credentials =
        Credentials::resolve(args.access_key_id.clone(), args.access_key_secret.clone())?;

    let sas = SasClient::new(credentials.clone());
    let ecs = EcsClient::new(&args.region, credentials);

    let assets = sas.ecs_assets().await?;
    let assets = filter_assets(assets, &args.region, args.instance_id.as_deref());

    if assets.is_empty() {
        println!(
            "no ECS assets in the Security Center inventory match region {}",
            args.region
        );
        return Ok(());
    }

    // A failed name lookup degrades the name column; the report still runs.
    let names: HashMap<String, String> = match ecs.instances().await {
        Ok(instances) => instances
            .into_iter()
            .map(|instance| (instance.instance_id, instance.instance_name))
            .collect(),
        Err(error) => {
            warn!(%error, "instance name lookup failed, using inventory names");
            HashMap::new()
        }
    };

    let assistant: HashMap<String, CloudAssistantStatus> = if args.check_cloud_assistant {
        let ids: Vec<String> = assets
            .iter()
            .map(|asset| asset.instance_id.clone())
            .collect();
        match ecs.cloud_assistant_status(&ids).await {
            Ok(statuses) => statuses
                .into_iter()
                .map(|status| (status.instance_id.clone(), status))
                .collect(),
            Err(error) => {
                warn!(%error, "cloud assistant lookup failed");
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    for asset in &assets {
        let mut line = format_asset_line(asset, &display_name(asset, &names));
        if args.check_cloud_assistant {
            line.push_str(&format_assistant_suffix(
                assistant.get(&asset.instance_id),
            ));
        }
        println!("{line}");
    }

    Ok(())
}

fn filter_assets(assets: Vec<Asset>, region: &str, instance_id: Option<&str>) -> Vec<Asset> {
    assets
        .into_iter()
        .filter(|asset| asset.region_id == region || asset.region == region)
        .filter(|asset| instance_id.is_none_or(|id| asset.instance_id == id))
        .collect()
}

/// ECS name when the join finds one, inventory name second, placeholder last.
fn display_name(asset: &Asset, names: &HashMap<String, String>) -> String {
    names
        .get(&asset.instance_id)
        .filter(|name| !name.is_empty())
        .cloned()
        .or_else(|| (!asset.instance_name.is_empty()).then(|| asset.instance_name.clone()))
        .unwrap_or_else(|| NAME_FALLBACK.to_string())
}

fn format_asset_line(asset: &Asset, name: &str) -> String {
    let agent = if asset.client_status.is_empty() {
        "not-installed"
    } else {
        &asset.client_status
    };
    let ip = [&asset.ip, &asset.intranet_ip, &asset.internet_ip]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .map(String::as_str)
        .unwrap_or("-");
    let vpc = if asset.vpc_instance_id.is_empty() {
        "-"
    } else {
        &asset.vpc_instance_id
    };
    let os = if asset.os_name.is_empty() {
        &asset.os
    } else {
        &asset.os_name
    };

    format!(
        "{:<22} {:<24} {:<14} agent={:<13} ip={:<15} vpc={:<14} os={}",
        asset.instance_id, name, asset.region_id, agent, ip, vpc, os
    )
}

fn format_assistant_suffix(status: Option<&CloudAssistantStatus>) -> String {
    match status {
        Some(status) => {
            let state = if status.cloud_assistant_status == "true" {
                "running"
            } else {
                "stopped"
            };
            let heartbeat = if status.last_heartbeat_time.is_empty() {
                "-"
            } else {
                &status.last_heartbeat_time
            };
            format!("  assistant={state} heartbeat={heartbeat}")
        }
        None => "  assistant=unknown".to_string(),
    }
}
