//! Response shapes for the ECS OpenAPI actions this tool calls.
//!
//! Only the fields the reports consume are modeled. Every container
//! defaults missing fields: the provider omits empty collections and some
//! fields vary by region and instance generation.

use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionsResponse {
    #[serde(default)]
    pub regions: Regions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Regions {
    pub region: Vec<Region>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Region {
    pub region_id: String,
    pub local_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstancesResponse {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub instances: Instances,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Instances {
    pub instance: Vec<Instance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Instance {
    pub instance_id: String,
    pub instance_name: String,
    pub status: String,
    #[serde(rename = "OSName")]
    pub os_name: String,
    pub region_id: String,
    pub vpc_attributes: VpcAttributes,
    pub public_ip_address: IpAddressSet,
    pub inner_ip_address: IpAddressSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcAttributes {
    pub vpc_id: String,
    pub private_ip_address: IpAddressSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IpAddressSet {
    pub ip_address: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DisksResponse {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub disks: Disks,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Disks {
    pub disk: Vec<Disk>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Disk {
    pub disk_id: String,
    /// "system" or "data".
    #[serde(rename = "Type")]
    pub disk_type: String,
    pub category: String,
    /// GiB.
    pub size: i64,
    pub status: String,
    /// Empty when the disk has no bound policy.
    pub auto_snapshot_policy_id: String,
    pub instance_id: String,
    pub attachments: Attachments,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Attachments {
    pub attachment: Vec<Attachment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Attachment {
    pub instance_id: String,
    pub device: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AutoSnapshotPoliciesResponse {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub auto_snapshot_policies: AutoSnapshotPolicies,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AutoSnapshotPolicies {
    pub auto_snapshot_policy: Vec<AutoSnapshotPolicy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AutoSnapshotPolicy {
    pub auto_snapshot_policy_id: String,
    pub auto_snapshot_policy_name: String,
    /// JSON-encoded list of weekdays, e.g. `["1","3","5"]`.
    pub repeat_weekdays: String,
    /// JSON-encoded list of hours, e.g. `["1"]`.
    pub time_points: String,
    /// -1 means keep forever.
    pub retention_days: i64,
    pub disk_nums: i64,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotsResponse {
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub snapshots: Snapshots,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Snapshots {
    pub snapshot: Vec<Snapshot>,
}

#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub snapshot_name: String,
    pub status: String,
    /// `YYYY-MM-DDTHH:MM:SSZ`.
    pub creation_time: String,
    pub source_disk_id: String,
    pub source_disk_type: String,
    /// GiB; some regions serialize this as a string.
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub source_disk_size: Option<i64>,
    pub progress: String,
    pub product_code: String,
    pub usage: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CloudAssistantResponse {
    #[serde(default)]
    pub instance_cloud_assistant_status_set: CloudAssistantStatusSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CloudAssistantStatusSet {
    pub instance_cloud_assistant_status: Vec<CloudAssistantStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CloudAssistantStatus {
    pub instance_id: String,
    /// "true" when the assistant agent is running.
    pub cloud_assistant_status: String,
    pub last_heartbeat_time: String,
    pub cloud_assistant_version: String,
}
