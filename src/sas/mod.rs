//! Typed client for the Security Center asset inventory.
//!
//! Security Center (SAS) is a separate OpenAPI service with a single
//! account-wide endpoint; assets are filtered by machine type server-side
//! and by region client-side.

use serde::Deserialize;

use crate::credentials::Credentials;
use crate::openapi::page::{PAGE_DELAY, PAGE_SIZE, Page, collect_pages};
use crate::openapi::{OpenApiClient, OpenApiError};

pub const API_VERSION: &str = "2018-12-03";

const ENDPOINT: &str = "tds.aliyuncs.com";

/// An ECS instance as represented in the security-monitoring inventory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Asset {
    pub instance_id: String,
    pub instance_name: String,
    pub uuid: String,
    /// Preferred address as chosen by the inventory.
    pub ip: String,
    pub intranet_ip: String,
    pub internet_ip: String,
    pub os: String,
    pub os_name: String,
    pub region: String,
    pub region_id: String,
    /// Agent state: "online", "offline" or "pause"; empty when the agent
    /// was never installed.
    pub client_status: String,
    pub client_version: String,
    pub vpc_instance_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssetsResponse {
    #[serde(default)]
    instances: Vec<Asset>,
    #[serde(default)]
    page_info: PageInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct PageInfo {
    total_count: i64,
}

pub struct SasClient {
    api: OpenApiClient,
}

impl SasClient {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            api: OpenApiClient::new(ENDPOINT, API_VERSION, credentials),
        }
    }

    /// The full ECS asset inventory known to Security Center.
    pub async fn ecs_assets(&self) -> Result<Vec<Asset>, OpenApiError> {
        collect_pages(PAGE_DELAY, |page_number| async move {
            let response: AssetsResponse = self
                .api
                .request(
                    "DescribeCloudCenterInstances",
                    vec![
                        ("MachineTypes".into(), "ecs".into()),
                        ("CurrentPage".into(), page_number.to_string()),
                        ("PageSize".into(), PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            Ok(Page {
                items: response.instances,
                total_count: response.page_info.total_count,
            })
        })
        .await
    }
}
