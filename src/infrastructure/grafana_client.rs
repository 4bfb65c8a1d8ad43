// Grafana HTTP API publisher implementation
use crate::application::dashboard_publisher::{DashboardPublisher, DeployReceipt, Folder};
use crate::domain::error::{BuildError, DeployError};
use crate::infrastructure::grafana_model::{DashboardModel, DashboardPayload};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GrafanaClient {
    host: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GrafanaClient {
    pub fn new(host: String, api_key: Option<String>, timeout: Duration) -> Result<Self, DeployError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            host: host.trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn bearer(&self) -> Result<String, DeployError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(format!("Bearer {}", key)),
            _ => Err(DeployError::MissingApiKey),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, DeployError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(DeployError::Rejected { status, body })
    }
}

#[async_trait]
impl DashboardPublisher for GrafanaClient {
    async fn publish(
        &self,
        dashboard: &DashboardModel,
        folder_id: i64,
    ) -> Result<DeployReceipt, DeployError> {
        let bearer = self.bearer()?;
        let payload = DashboardPayload {
            dashboard,
            folder_id,
            overwrite: true,
        };
        let body = payload.to_json().map_err(BuildError::from)?;

        let url = format!("{}/api/dashboards/db", self.host);
        tracing::debug!("POST {} ({} bytes)", url, body.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", bearer)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        let receipt = Self::check(response).await?.json::<DeployReceipt>().await?;
        Ok(receipt)
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, DeployError> {
        let bearer = self.bearer()?;
        let url = format!("{}/api/folders", self.host);

        let response = self
            .client
            .get(&url)
            .header("Authorization", bearer)
            .header("Accept", "application/json")
            .send()
            .await?;

        let folders = Self::check(response).await?.json::<Vec<Folder>>().await?;
        tracing::debug!("Found {} folders", folders.len());
        Ok(folders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::grafana_model::{Templating, TimeRange};
    use httpmock::prelude::*;
    use serde_json::json;

    fn model() -> DashboardModel {
        DashboardModel {
            uid: "creo-prod-dashboard".to_string(),
            title: "creo | prod | Service Dashboard".to_string(),
            tags: vec!["creo".to_string()],
            timezone: "browser".to_string(),
            editable: true,
            refresh: "10s".to_string(),
            time: TimeRange {
                from: "now-1h".to_string(),
                to: "now".to_string(),
            },
            schema_version: 39,
            panels: Vec::new(),
            templating: Templating { list: Vec::new() },
        }
    }

    fn client(server: &MockServer, api_key: Option<&str>) -> GrafanaClient {
        GrafanaClient::new(
            server.base_url(),
            api_key.map(str::to_string),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_publish_sends_envelope_with_bearer() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/dashboards/db")
                    .header("Authorization", "Bearer secret")
                    .json_body_partial(r#"{"folderId": 129, "overwrite": true, "dashboard": {"uid": "creo-prod-dashboard"}}"#);
                then.status(200).json_body(json!({
                    "id": 7,
                    "uid": "creo-prod-dashboard",
                    "url": "/d/creo-prod-dashboard/creo",
                    "status": "success",
                    "version": 3
                }));
            })
            .await;

        let receipt = client(&server, Some("secret")).publish(&model(), 129).await.unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.status, "success");
        assert_eq!(receipt.version, Some(3));
    }

    #[tokio::test]
    async fn test_publish_surfaces_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/dashboards/db");
                then.status(412).body("version-mismatch");
            })
            .await;

        let err = client(&server, Some("secret")).publish(&model(), 1).await.unwrap_err();

        match err {
            DeployError::Rejected { status, body } => {
                assert_eq!(status, 412);
                assert_eq!(body, "version-mismatch");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_api_key_sends_nothing() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/dashboards/db");
                then.status(200);
            })
            .await;

        let err = client(&server, None).publish(&model(), 1).await.unwrap_err();

        assert!(matches!(err, DeployError::MissingApiKey));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_list_folders() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/folders");
                then.status(200).json_body(json!([
                    {"id": 129, "uid": "dac", "title": "DAC Service Dashboards"},
                    {"id": 34, "uid": "net", "title": "Network"}
                ]));
            })
            .await;

        let folders = client(&server, Some("secret")).list_folders().await.unwrap();

        assert_eq!(folders.len(), 2);
        assert_eq!(folders[1].title, "Network");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_request_error() {
        let client = GrafanaClient::new(
            "http://127.0.0.1:1".to_string(),
            Some("secret".to_string()),
            Duration::from_secs(1),
        )
        .unwrap();

        let err = client.list_folders().await.unwrap_err();
        assert!(matches!(err, DeployError::Request(_)));

        let err = client.publish(&model(), 1).await.unwrap_err();
        assert!(matches!(err, DeployError::Request(_)));
    }
}
