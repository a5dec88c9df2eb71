//! Typed client for the ECS OpenAPI actions used by the reports.

pub mod model;

pub use model::*;

use crate::credentials::Credentials;
use crate::openapi::page::{PAGE_DELAY, PAGE_SIZE, Page, collect_pages};
use crate::openapi::{OpenApiClient, OpenApiError};

pub const API_VERSION: &str = "2014-05-26";

/// Cloud Assistant status lookups take at most this many explicit ids.
const ASSISTANT_BATCH: usize = 50;

pub struct EcsClient {
    api: OpenApiClient,
    region_id: String,
}

impl EcsClient {
    pub fn new(region_id: &str, credentials: Credentials) -> Self {
        let endpoint = format!("ecs.{region_id}.aliyuncs.com");
        Self {
            api: OpenApiClient::new(endpoint, API_VERSION, credentials),
            region_id: region_id.to_string(),
        }
    }

    /// Regions visible to the account. Cheapest authenticated call, used as
    /// the snapshot report's smoke test.
    pub async fn regions(&self) -> Result<Vec<Region>, OpenApiError> {
        let response: RegionsResponse = self.api.request("DescribeRegions", Vec::new()).await?;
        Ok(response.regions.region)
    }

    /// All instances in the region.
    pub async fn instances(&self) -> Result<Vec<Instance>, OpenApiError> {
        collect_pages(PAGE_DELAY, |page_number| self.instances_page(page_number)).await
    }

    async fn instances_page(&self, page_number: i64) -> Result<Page<Instance>, OpenApiError> {
        let response: InstancesResponse = self
            .api
            .request(
                "DescribeInstances",
                vec![
                    ("RegionId".into(), self.region_id.clone()),
                    ("PageNumber".into(), page_number.to_string()),
                    ("PageSize".into(), PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        Ok(Page {
            items: response.instances.instance,
            total_count: response.total_count,
        })
    }

    /// Instances looked up by explicit id (at most 100 per the API contract;
    /// callers here pass one or two).
    pub async fn instances_by_ids(&self, ids: &[String]) -> Result<Vec<Instance>, OpenApiError> {
        let response: InstancesResponse = self
            .api
            .request(
                "DescribeInstances",
                vec![
                    ("RegionId".into(), self.region_id.clone()),
                    ("InstanceIds".into(), serde_json::json!(ids).to_string()),
                    ("PageSize".into(), PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        Ok(response.instances.instance)
    }

    /// All disks attached to one instance.
    pub async fn disks_for_instance(&self, instance_id: &str) -> Result<Vec<Disk>, OpenApiError> {
        collect_pages(PAGE_DELAY, |page_number| async move {
            let response: DisksResponse = self
                .api
                .request(
                    "DescribeDisks",
                    vec![
                        ("RegionId".into(), self.region_id.clone()),
                        ("InstanceId".into(), instance_id.to_string()),
                        ("PageNumber".into(), page_number.to_string()),
                        ("PageSize".into(), PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            Ok(Page {
                items: response.disks.disk,
                total_count: response.total_count,
            })
        })
        .await
    }

    /// Disks looked up by explicit id.
    pub async fn disks_by_ids(&self, ids: &[String]) -> Result<Vec<Disk>, OpenApiError> {
        let response: DisksResponse = self
            .api
            .request(
                "DescribeDisks",
                vec![
                    ("RegionId".into(), self.region_id.clone()),
                    ("DiskIds".into(), serde_json::json!(ids).to_string()),
                    ("PageSize".into(), PAGE_SIZE.to_string()),
                ],
            )
            .await?;

        Ok(response.disks.disk)
    }

    /// Automatic snapshot policies defined in the region.
    pub async fn auto_snapshot_policies(&self) -> Result<Vec<AutoSnapshotPolicy>, OpenApiError> {
        collect_pages(PAGE_DELAY, |page_number| async move {
            let response: AutoSnapshotPoliciesResponse = self
                .api
                .request(
                    "DescribeAutoSnapshotPolicyEx",
                    vec![
                        ("RegionId".into(), self.region_id.clone()),
                        ("PageNumber".into(), page_number.to_string()),
                        ("PageSize".into(), PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            Ok(Page {
                items: response.auto_snapshot_policies.auto_snapshot_policy,
                total_count: response.total_count,
            })
        })
        .await
    }

    /// Every snapshot in the region, regardless of state.
    pub async fn snapshots(&self) -> Result<Vec<Snapshot>, OpenApiError> {
        collect_pages(PAGE_DELAY, |page_number| async move {
            let response: SnapshotsResponse = self
                .api
                .request(
                    "DescribeSnapshots",
                    vec![
                        ("RegionId".into(), self.region_id.clone()),
                        ("Status".into(), "all".into()),
                        ("PageNumber".into(), page_number.to_string()),
                        ("PageSize".into(), PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            Ok(Page {
                items: response.snapshots.snapshot,
                total_count: response.total_count,
            })
        })
        .await
    }

    /// Cloud Assistant agent status for the given instances, batched to the
    /// API's repeated-parameter limit.
    pub async fn cloud_assistant_status(
        &self,
        ids: &[String],
    ) -> Result<Vec<CloudAssistantStatus>, OpenApiError> {
        let mut statuses = Vec::with_capacity(ids.len());

        for batch in ids.chunks(ASSISTANT_BATCH) {
            let mut params = vec![("RegionId".to_string(), self.region_id.clone())];
            params.extend(
                batch
                    .iter()
                    .enumerate()
                    .map(|(index, id)| (format!("InstanceId.{}", index + 1), id.clone())),
            );

            let response: CloudAssistantResponse = self
                .api
                .request("DescribeCloudAssistantStatus", params)
                .await?;

            statuses.extend(
                response
                    .instance_cloud_assistant_status_set
                    .instance_cloud_assistant_status,
            );
        }

        Ok(statuses)
    }
}
