// Command-line interface
use crate::application::presets::jams::jams_dashboard;
use crate::application::presets::network::network_dashboard;
use crate::application::presets::service::service_dashboard;
use crate::application::dashboard_service::DashboardService;
use crate::domain::dashboard::Dashboard;
use crate::domain::environment::DeploymentEnv;
use crate::infrastructure::config::{
    load_catalogue_config, load_grafana_config, prepare_query, unresolved_placeholders,
    CatalogueConfig,
};
use crate::presentation::app_state::AppState;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::collections::HashMap;

/// Build Grafana dashboards from code and deploy them
#[derive(Parser, Debug)]
#[command(name = "automated-dashboards")]
#[command(about = "Render and deploy Grafana dashboards", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the rendered service dashboard JSON
    Render(ServiceArgs),

    /// Print the rendered network monitoring dashboard JSON
    RenderNetwork,

    /// Print the rendered JAMS dashboard JSON for one JAMS folder
    RenderJams(JamsArgs),

    /// Deploy one service dashboard
    Deploy(DeployArgs),

    /// Deploy the network monitoring dashboard
    DeployNetwork(FolderArgs),

    /// Deploy every dashboard listed in the catalogue
    DeployAll,
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Service name as it appears in the service_name label
    #[arg(long)]
    pub service: String,

    /// Deployment environment
    #[arg(long, value_enum)]
    pub env: DeploymentEnv,
}

#[derive(Args, Debug)]
pub struct JamsArgs {
    /// JAMS folder name as listed in the catalogue, e.g. CASHMONEY
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub target: ServiceArgs,

    #[command(flatten)]
    pub folder: FolderArgs,
}

#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Target folder ID; prompts when neither this nor a configured default is set
    #[arg(long)]
    pub folder: Option<i64>,
}

/// Execute CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Render(args) => {
            let catalogue = load_catalogue_config()?;
            let dashboard = catalogue_service_dashboard(&catalogue, &args.service, args.env);
            println!("{}", DashboardService::render(&dashboard)?);
            Ok(())
        }
        Commands::RenderNetwork => {
            let catalogue = load_catalogue_config()?;
            println!("{}", DashboardService::render(&catalogue_network_dashboard(&catalogue))?);
            Ok(())
        }
        Commands::RenderJams(args) => {
            let catalogue = load_catalogue_config()?;
            let Some(dashboard) = catalogue_jams_dashboards(&catalogue)
                .into_iter()
                .find(|d| d.service.eq_ignore_ascii_case(&format!("jams-{}", args.name)))
            else {
                anyhow::bail!("no JAMS folder named '{}' in the catalogue", args.name);
            };
            println!("{}", DashboardService::render(&dashboard)?);
            Ok(())
        }
        Commands::Deploy(args) => {
            let state = load_state()?;
            let dashboard = catalogue_service_dashboard(&state.catalogue, &args.target.service, args.target.env);
            let folder = args.folder.folder.or(state.default_folder);
            state.dashboard_service.deploy(&dashboard, folder).await?;
            Ok(())
        }
        Commands::DeployNetwork(args) => {
            let state = load_state()?;
            let dashboard = catalogue_network_dashboard(&state.catalogue);
            let folder = args.folder.or(state.default_folder);
            state.dashboard_service.deploy(&dashboard, folder).await?;
            Ok(())
        }
        Commands::DeployAll => deploy_all(&load_state()?).await,
    }
}

fn load_state() -> Result<AppState> {
    AppState::new(load_grafana_config()?, load_catalogue_config()?)
}

/// Deploys each catalogue entry in turn; a failure is logged and the rest still run.
async fn deploy_all(state: &AppState) -> Result<()> {
    let targets = catalogue_targets(&state.catalogue);

    tracing::info!("Deploying {} dashboards", targets.len());
    let mut failed = Vec::new();
    for (dashboard, folder_id) in &targets {
        match state.dashboard_service.deploy(dashboard, Some(*folder_id)).await {
            Ok(_) => tracing::info!("{} deployed successfully", dashboard.title),
            Err(e) => {
                tracing::error!("Failed to deploy {}: {}", dashboard.title, e);
                failed.push(dashboard.title.clone());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!("{} of {} dashboards failed to deploy: {}", failed.len(), targets.len(), failed.join(", "));
    }
    Ok(())
}

/// Every catalogue dashboard paired with the folder it deploys into.
pub fn catalogue_targets(catalogue: &CatalogueConfig) -> Vec<(Dashboard, i64)> {
    let mut targets = Vec::new();
    let services = &catalogue.service_dashboards;
    for service in &services.services {
        for env in &services.environments {
            targets.push((
                catalogue_service_dashboard(catalogue, service, *env),
                services.folder_id,
            ));
        }
    }
    targets.push((
        catalogue_network_dashboard(catalogue),
        catalogue.network_dashboard.folder_id,
    ));
    for dashboard in catalogue_jams_dashboards(catalogue) {
        targets.push((dashboard, catalogue.jams_dashboards.folder_id));
    }
    targets
}

pub fn catalogue_service_dashboard(
    catalogue: &CatalogueConfig,
    service: &str,
    env: DeploymentEnv,
) -> Dashboard {
    let mut vars = HashMap::new();
    vars.insert("service".to_string(), service.to_string());
    vars.insert("env_selector".to_string(), env.label_selector().to_string());
    let hostname_query = prepare_query(&catalogue.service_dashboards.hostname_query, &vars);
    let unresolved = unresolved_placeholders(&hostname_query);
    if !unresolved.is_empty() {
        tracing::warn!(
            "Hostname query for {} has unknown placeholders {:?}; known: service, env_selector",
            service,
            unresolved
        );
    }

    service_dashboard(service, env, &catalogue.datasources, &hostname_query)
}

pub fn catalogue_network_dashboard(catalogue: &CatalogueConfig) -> Dashboard {
    let network = &catalogue.network_dashboard;
    network_dashboard(
        &network.title,
        network.tags.clone(),
        &network.service,
        &network.env,
        &catalogue.datasources.metrics,
    )
}

pub fn catalogue_jams_dashboards(catalogue: &CatalogueConfig) -> Vec<Dashboard> {
    catalogue
        .jams_dashboards
        .folders
        .iter()
        .map(|folder| jams_dashboard(&folder.name, &folder.host_pattern, &catalogue.datasources.metrics))
        .collect()
}
