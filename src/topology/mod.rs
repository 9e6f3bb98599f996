//! External topology source: the system of record for service offerings.
//!
//! The catalog never interprets topology failures beyond surfacing them as
//! `Error::Topology`; the HTTP layer decides the status code.

mod http;
mod shapes;

pub use http::HttpTopology;
pub use shapes::{ServicePlan, provider_control_parameters, service_plans};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyServicePlan {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub create_json_schema: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerProject {
    pub name: String,
}

#[async_trait]
pub trait TopologySource: Send + Sync {
    async fn service_offering(&self, service_offering_ref: &str) -> Result<ServiceOffering>;

    async fn service_offering_plans(
        &self,
        service_offering_ref: &str,
    ) -> Result<Vec<TopologyServicePlan>>;

    async fn container_projects(&self, source_ref: &str) -> Result<Vec<ContainerProject>>;
}

/// Used when no topology URL is configured. Every call fails.
pub struct UnconfiguredTopology;

fn not_configured<T>() -> Result<T> {
    Err(Error::Topology("topology source not configured".to_string()))
}

#[async_trait]
impl TopologySource for UnconfiguredTopology {
    async fn service_offering(&self, _service_offering_ref: &str) -> Result<ServiceOffering> {
        not_configured()
    }

    async fn service_offering_plans(
        &self,
        _service_offering_ref: &str,
    ) -> Result<Vec<TopologyServicePlan>> {
        not_configured()
    }

    async fn container_projects(&self, _source_ref: &str) -> Result<Vec<ContainerProject>> {
        not_configured()
    }
}
