// Application state shared by CLI commands
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::{CatalogueConfig, GrafanaConfig};
use crate::infrastructure::grafana_client::GrafanaClient;
use crate::presentation::prompt::StdinFolderPrompt;
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub catalogue: CatalogueConfig,
    pub default_folder: Option<i64>,
}

impl AppState {
    pub fn new(grafana: GrafanaConfig, catalogue: CatalogueConfig) -> anyhow::Result<Self> {
        let client = GrafanaClient::new(
            grafana.grafana.url,
            grafana.grafana.api_key,
            Duration::from_secs(grafana.grafana.timeout_secs),
        )
        .context("Failed to create Grafana client")?;

        Ok(Self {
            dashboard_service: DashboardService::new(Arc::new(client), Arc::new(StdinFolderPrompt)),
            catalogue,
            default_folder: grafana.grafana.default_folder,
        })
    }
}
