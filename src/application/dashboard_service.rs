// Dashboard service - Use case for building and deploying dashboards
use crate::application::dashboard_publisher::{DashboardPublisher, DeployReceipt, Folder, FolderPrompt};
use crate::application::validation::validate_variable_references;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{BuildError, DeployError};
use crate::infrastructure::grafana_mapper::dashboard_to_grafana;
use crate::infrastructure::grafana_model::DashboardModel;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardService {
    publisher: Arc<dyn DashboardPublisher>,
    prompt: Arc<dyn FolderPrompt>,
}

impl DashboardService {
    pub fn new(publisher: Arc<dyn DashboardPublisher>, prompt: Arc<dyn FolderPrompt>) -> Self {
        Self { publisher, prompt }
    }

    /// Validate variable references and render the Grafana model.
    pub fn build(dashboard: &Dashboard) -> Result<DashboardModel, BuildError> {
        validate_variable_references(dashboard)?;
        Ok(dashboard_to_grafana(dashboard))
    }

    /// Render straight to the JSON document Grafana stores.
    pub fn render(dashboard: &Dashboard) -> Result<String, BuildError> {
        Ok(Self::build(dashboard)?.to_json()?)
    }

    /// Build, then upload into `folder`, asking the operator when no folder is given.
    pub async fn deploy(
        &self,
        dashboard: &Dashboard,
        folder: Option<i64>,
    ) -> Result<DeployReceipt, DeployError> {
        let model = Self::build(dashboard)?;

        let folder_id = match folder {
            Some(id) => id,
            None => {
                let folders = self.publisher.list_folders().await?;
                self.ask_for_folder(&dashboard.title, folders).await?
            }
        };

        tracing::info!("Deploying dashboard '{}' to folder {}", dashboard.title, folder_id);
        let receipt = self.publisher.publish(&model, folder_id).await?;
        tracing::info!(
            "Dashboard '{}' saved as {} (status: {})",
            dashboard.title,
            receipt.uid,
            receipt.status
        );

        Ok(receipt)
    }

    /// The prompt may block on the terminal, so it runs off the async workers.
    async fn ask_for_folder(&self, title: &str, folders: Vec<Folder>) -> Result<i64, DeployError> {
        let prompt = Arc::clone(&self.prompt);
        let title = title.to_string();
        tokio::task::spawn_blocking(move || prompt.choose_folder(&title, &folders))
            .await
            .map_err(|e| DeployError::Prompt(std::io::Error::other(e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::datasource::DataSource;
    use crate::domain::panel::Panel;
    use crate::domain::query::Query;
    use crate::domain::section::Section;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::thread::{self, ThreadId};

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(String, i64)>>,
    }

    #[async_trait]
    impl DashboardPublisher for RecordingPublisher {
        async fn publish(
            &self,
            dashboard: &DashboardModel,
            folder_id: i64,
        ) -> Result<DeployReceipt, DeployError> {
            self.published
                .lock()
                .unwrap()
                .push((dashboard.uid.clone(), folder_id));
            Ok(DeployReceipt {
                id: Some(1),
                uid: dashboard.uid.clone(),
                url: format!("/d/{}", dashboard.uid),
                status: "success".to_string(),
                version: Some(1),
            })
        }

        async fn list_folders(&self) -> Result<Vec<Folder>, DeployError> {
            Ok(vec![Folder {
                id: 129,
                uid: "dac".to_string(),
                title: "DAC Service Dashboards".to_string(),
            }])
        }
    }

    struct FirstFolder;

    impl FolderPrompt for FirstFolder {
        fn choose_folder(&self, _title: &str, folders: &[Folder]) -> Result<i64, DeployError> {
            folders
                .first()
                .map(|f| f.id)
                .ok_or_else(|| DeployError::InvalidFolder("no folders".to_string()))
        }
    }

    #[derive(Default)]
    struct ThreadRecordingPrompt {
        thread: Mutex<Option<ThreadId>>,
    }

    impl FolderPrompt for ThreadRecordingPrompt {
        fn choose_folder(&self, _title: &str, _folders: &[Folder]) -> Result<i64, DeployError> {
            *self.thread.lock().unwrap() = Some(thread::current().id());
            Ok(7)
        }
    }

    fn metrics() -> DataSource {
        DataSource::prometheus("m")
    }

    fn host_dashboard() -> Dashboard {
        let section = Section::new("Host Metrics").with_panel(
            Panel::timeseries("Memory", metrics())
                .with_query(Query::prometheus(r#"mem{host_name=~"$Hostname"}"#, metrics())),
        );
        Dashboard::new("Hosts", vec!["DAC".to_string()], "prod", "hosts", vec![section])
    }

    fn service(publisher: Arc<RecordingPublisher>) -> DashboardService {
        DashboardService::new(publisher, Arc::new(FirstFolder))
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut dashboard = host_dashboard();
        dashboard.add_dashboard_variable("Hostname", "label_values(host_name)", true, true, metrics());

        let first = DashboardService::render(&dashboard).unwrap();
        let second = DashboardService::render(&dashboard).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_late_panel_is_rendered() {
        let mut dashboard = host_dashboard();
        dashboard.add_dashboard_variable("Hostname", "label_values(host_name)", true, true, metrics());
        let before = DashboardService::render(&dashboard).unwrap();
        assert!(!before.contains("Disk I/O Read"));

        dashboard.section_mut("Host Metrics").unwrap().add_panel(
            Panel::timeseries("Disk I/O Read", metrics())
                .with_query(Query::prometheus("rate(system_disk_io[5m])", metrics())),
        );
        let after = DashboardService::render(&dashboard).unwrap();
        assert!(after.contains("Disk I/O Read"));
    }

    #[test]
    fn test_build_rejects_undeclared_variable() {
        let err = DashboardService::build(&host_dashboard()).unwrap_err();
        assert_eq!(err.undeclared_names(), vec!["Hostname"]);
    }

    #[tokio::test]
    async fn test_deploy_uses_given_folder() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut dashboard = host_dashboard();
        dashboard.add_dashboard_variable("Hostname", "label_values(host_name)", true, true, metrics());

        let receipt = service(publisher.clone()).deploy(&dashboard, Some(34)).await.unwrap();

        assert_eq!(receipt.uid, "hosts-prod-dashboard");
        assert_eq!(
            *publisher.published.lock().unwrap(),
            vec![("hosts-prod-dashboard".to_string(), 34)]
        );
    }

    #[tokio::test]
    async fn test_deploy_prompts_without_folder() {
        let publisher = Arc::new(RecordingPublisher::default());
        let mut dashboard = host_dashboard();
        dashboard.add_dashboard_variable("Hostname", "label_values(host_name)", true, true, metrics());

        service(publisher.clone()).deploy(&dashboard, None).await.unwrap();

        assert_eq!(publisher.published.lock().unwrap()[0].1, 129);
    }

    #[tokio::test]
    async fn test_deploy_stops_on_validation_error() {
        let publisher = Arc::new(RecordingPublisher::default());

        let err = service(publisher.clone())
            .deploy(&host_dashboard(), Some(34))
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::Build(BuildError::UndeclaredVariables { .. })));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_prompt_runs_off_the_async_thread() {
        let publisher = Arc::new(RecordingPublisher::default());
        let prompt = Arc::new(ThreadRecordingPrompt::default());
        let mut dashboard = host_dashboard();
        dashboard.add_dashboard_variable("Hostname", "label_values(host_name)", true, true, metrics());

        DashboardService::new(publisher.clone(), prompt.clone())
            .deploy(&dashboard, None)
            .await
            .unwrap();

        let prompt_thread = prompt.thread.lock().unwrap().expect("prompt was asked");
        assert_ne!(prompt_thread, thread::current().id());
        assert_eq!(publisher.published.lock().unwrap()[0].1, 7);
    }
}
