// Publisher trait for uploading rendered dashboards
use crate::domain::error::DeployError;
use crate::infrastructure::grafana_model::DashboardModel;
use async_trait::async_trait;
use serde::Deserialize;

/// A Grafana folder a dashboard can be saved into.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Folder {
    pub id: i64,
    pub uid: String,
    pub title: String,
}

/// Grafana's answer to a successful dashboard save.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeployReceipt {
    #[serde(default)]
    pub id: Option<i64>,
    pub uid: String,
    pub url: String,
    pub status: String,
    #[serde(default)]
    pub version: Option<i64>,
}

#[async_trait]
pub trait DashboardPublisher: Send + Sync {
    /// Create or overwrite the dashboard in the given folder
    async fn publish(&self, dashboard: &DashboardModel, folder_id: i64) -> Result<DeployReceipt, DeployError>;

    /// List folders the credentials can see
    async fn list_folders(&self) -> Result<Vec<Folder>, DeployError>;
}

/// Asks the operator which folder to deploy into.
pub trait FolderPrompt: Send + Sync {
    fn choose_folder(&self, dashboard_title: &str, folders: &[Folder]) -> Result<i64, DeployError>;
}
