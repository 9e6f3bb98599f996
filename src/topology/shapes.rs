use serde::Serialize;
use serde_json::{Value, json};

use super::TopologySource;
use crate::error::{Error, Result};
use crate::types::PortfolioItem;

/// A service plan as the catalog presents it for a portfolio item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePlan {
    pub service_offering_id: String,
    pub service_plan_ref: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub create_json_schema: Option<Value>,
}

pub async fn service_plans(
    topology: &dyn TopologySource,
    item: &PortfolioItem,
) -> Result<Vec<ServicePlan>> {
    let plans = topology
        .service_offering_plans(&item.service_offering_ref)
        .await?;

    Ok(plans
        .into_iter()
        .map(|plan| ServicePlan {
            service_offering_id: item.service_offering_ref.clone(),
            service_plan_ref: plan.id,
            name: plan.name,
            description: plan.description,
            create_json_schema: plan.create_json_schema,
        })
        .collect())
}

/// JSON schema for the provider-side parameters of an order: the target
/// project/namespace on the item's source.
pub async fn provider_control_parameters(
    topology: &dyn TopologySource,
    item: &PortfolioItem,
) -> Result<Value> {
    let source_ref = item.service_offering_source_ref.as_deref().ok_or_else(|| {
        Error::Topology(format!("portfolio item {} has no source", item.id))
    })?;

    let projects: Vec<String> = topology
        .container_projects(source_ref)
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect();

    Ok(json!({
        "$schema": "http://json-schema.org/draft-04/schema#",
        "type": "object",
        "title": "OpenShift/Kubernetes namespace",
        "properties": {
            "namespace": {
                "title": "Project/Namespace",
                "type": "string",
                "enum": projects,
            }
        },
        "required": ["namespace"],
    }))
}
