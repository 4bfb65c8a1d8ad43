use crate::domain::datasource::DataSources;
use crate::domain::environment::DeploymentEnv;
use serde::Deserialize;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Deserialize, Clone)]
pub struct GrafanaConfig {
    pub grafana: GrafanaSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GrafanaSettings {
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub default_folder: Option<i64>,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogueConfig {
    pub datasources: DataSources,
    pub service_dashboards: ServiceDashboardsConfig,
    pub network_dashboard: NetworkDashboardConfig,
    pub jams_dashboards: JamsDashboardsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceDashboardsConfig {
    pub folder_id: i64,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub environments: Vec<DeploymentEnv>,
    /// Query for the `Hostname` variable; `${service}` and `${env_selector}` are substituted.
    pub hostname_query: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NetworkDashboardConfig {
    pub folder_id: i64,
    pub title: String,
    pub service: String,
    pub env: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JamsDashboardsConfig {
    pub folder_id: i64,
    #[serde(default)]
    pub folders: Vec<JamsFolderConfig>,
}

/// One JAMS folder and the regex matching its hosts.
#[derive(Debug, Deserialize, Clone)]
pub struct JamsFolderConfig {
    pub name: String,
    pub host_pattern: String,
}

pub fn load_grafana_config() -> anyhow::Result<GrafanaConfig> {
    build_grafana_config(
        config::File::with_name("config/grafana"),
        std::env::var("GRAFANA_API_KEY").ok(),
    )
}

pub fn load_catalogue_config() -> anyhow::Result<CatalogueConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboards"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// The `api_key` argument, when present, wins over the file.
fn build_grafana_config<S>(source: S, api_key: Option<String>) -> anyhow::Result<GrafanaConfig>
where
    S: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .add_source(source)
        .set_override_option("grafana.api_key", api_key)?
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a query string
pub fn prepare_query(query: &str, vars: &HashMap<String, String>) -> String {
    let mut result = query.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

/// `${key}` placeholders still present after [`prepare_query`].
pub fn unresolved_placeholders(query: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(query)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    const GRAFANA_TOML: &str = r#"
        [grafana]
        url = "https://grafana.example.com"
        api_key = "from-file"
    "#;

    #[test]
    fn test_prepare_query() {
        let mut vars = HashMap::new();
        vars.insert("service".to_string(), "creo".to_string());
        vars.insert("env_selector".to_string(), "env=\"prod\"".to_string());

        let query = "label_values(up{service_name=\"${service}\", ${env_selector}}, host_name)";
        let result = prepare_query(query, &vars);

        assert_eq!(result, "label_values(up{service_name=\"creo\", env=\"prod\"}, host_name)");
    }

    #[test]
    fn test_prepare_query_leaves_unknown_placeholders() {
        let vars = HashMap::new();
        assert_eq!(prepare_query("up{host=~\"${Hostname}\"}", &vars), "up{host=~\"${Hostname}\"}");
    }

    #[test]
    fn test_unresolved_placeholders() {
        let mut vars = HashMap::new();
        vars.insert("service".to_string(), "creo".to_string());

        let prepared = prepare_query("up{service_name=\"${servce}\", host=\"${service}\"}", &vars);

        assert_eq!(unresolved_placeholders(&prepared), vec!["servce"]);
        assert!(unresolved_placeholders("up{service_name=\"creo\", env=~\".*_PROD$|Prod\"}").is_empty());
    }

    #[test]
    fn test_grafana_config_defaults() {
        let config =
            build_grafana_config(File::from_str(GRAFANA_TOML, FileFormat::Toml), None).unwrap();

        assert_eq!(config.grafana.url, "https://grafana.example.com");
        assert_eq!(config.grafana.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.grafana.timeout_secs, 10);
        assert_eq!(config.grafana.default_folder, None);
    }

    #[test]
    fn test_api_key_override_wins() {
        let config = build_grafana_config(
            File::from_str(GRAFANA_TOML, FileFormat::Toml),
            Some("from-env".to_string()),
        )
        .unwrap();

        assert_eq!(config.grafana.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_catalogue_config_parses() {
        let toml = r#"
            [datasources.metrics]
            type = "prometheus"
            uid = "m"
            [datasources.logs]
            type = "loki"
            uid = "l"
            [datasources.traces]
            type = "tempo"
            uid = "t"

            [service_dashboards]
            folder_id = 129
            services = ["creo", "voltaire"]
            environments = ["prod", "nonprod"]
            hostname_query = "label_values(up{service_name=\"${service}\"}, host_name)"

            [network_dashboard]
            folder_id = 34
            title = "Network"
            service = "snmp-monitoring"
            env = "production"

            [jams_dashboards]
            folder_id = 32
            [[jams_dashboards.folders]]
            name = "CASHMONEY"
            host_pattern = "awsuse2pcb[0-9]*"
            [[jams_dashboards.folders]]
            name = "BUSAPPS"
            host_pattern = "awsuse2pbsap[0-9]*"
        "#;
        let settings = config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        let catalogue: CatalogueConfig = settings.try_deserialize().unwrap();

        assert_eq!(catalogue.datasources.logs.kind, "loki");
        assert_eq!(catalogue.service_dashboards.services.len(), 2);
        assert_eq!(
            catalogue.service_dashboards.environments,
            vec![DeploymentEnv::Prod, DeploymentEnv::Nonprod]
        );
        assert!(catalogue.network_dashboard.tags.is_empty());
        assert_eq!(catalogue.jams_dashboards.folder_id, 32);
        assert_eq!(catalogue.jams_dashboards.folders[1].name, "BUSAPPS");
        assert_eq!(catalogue.jams_dashboards.folders[0].host_pattern, "awsuse2pcb[0-9]*");
    }
}
