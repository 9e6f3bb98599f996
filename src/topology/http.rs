use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{ContainerProject, ServiceOffering, TopologyServicePlan, TopologySource};
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct Collection<T> {
    data: Vec<T>,
}

/// Topology source backed by the topological inventory REST API.
pub struct HttpTopology {
    client: Client,
    base_url: String,
}

impl HttpTopology {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Topology(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Topology(format!(
                "{url} returned {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Topology(format!("invalid response from {url}: {e}")))
    }
}

#[async_trait]
impl TopologySource for HttpTopology {
    async fn service_offering(&self, service_offering_ref: &str) -> Result<ServiceOffering> {
        self.get(&format!("/service_offerings/{service_offering_ref}"))
            .await
    }

    async fn service_offering_plans(
        &self,
        service_offering_ref: &str,
    ) -> Result<Vec<TopologyServicePlan>> {
        let plans: Collection<TopologyServicePlan> = self
            .get(&format!("/service_offerings/{service_offering_ref}/service_plans"))
            .await?;
        Ok(plans.data)
    }

    async fn container_projects(&self, source_ref: &str) -> Result<Vec<ContainerProject>> {
        let projects: Collection<ContainerProject> = self
            .get(&format!("/sources/{source_ref}/container_projects"))
            .await?;
        Ok(projects.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetches_service_offering() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/service_offerings/998"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "998",
                "name": "PostgreSQL",
                "description": "Managed database",
                "source_id": "568",
                "extra": "ignored"
            })))
            .mount(&mock_server)
            .await;

        let topology = HttpTopology::new(&format!("{}/", mock_server.uri()));
        let offering = topology.service_offering("998").await.unwrap();

        assert_eq!(offering.name, "PostgreSQL");
        assert_eq!(offering.source_id.as_deref(), Some("568"));
    }

    #[tokio::test]
    async fn test_unwraps_plan_collection() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/service_offerings/998/service_plans"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"id": "1", "name": "small", "create_json_schema": {"type": "object"}},
                    {"id": "2", "name": "large"}
                ]
            })))
            .mount(&mock_server)
            .await;

        let topology = HttpTopology::new(&mock_server.uri());
        let plans = topology.service_offering_plans("998").await.unwrap();

        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].create_json_schema, Some(serde_json::json!({"type": "object"})));
        assert!(plans[1].create_json_schema.is_none());
    }

    #[tokio::test]
    async fn test_error_status_is_topology_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sources/568/container_projects"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let topology = HttpTopology::new(&mock_server.uri());
        let result = topology.container_projects("568").await;

        assert!(matches!(result, Err(Error::Topology(_))));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_topology_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/service_offerings/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("kaboom"))
            .mount(&mock_server)
            .await;

        let topology = HttpTopology::new(&mock_server.uri());
        assert!(matches!(
            topology.service_offering("1").await,
            Err(Error::Topology(_))
        ));
    }
}
