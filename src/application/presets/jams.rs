// JAMS scheduler dashboards: host metrics plus job exit severity per JAMS folder
use super::service::{infrastructure_section, HOSTNAME_VARIABLE};
use crate::domain::dashboard::Dashboard;
use crate::domain::datasource::DataSource;
use crate::domain::panel::{units, FieldOverride, Orientation, Panel};
use crate::domain::query::Query;
use crate::domain::section::Section;
use serde_json::json;

const SEVERITY_COLORS: [(&str, &str); 4] = [
    ("Error", "red"),
    ("Warning", "yellow"),
    ("Success", "green"),
    ("Unknown", "white"),
];

/// Dashboard for one JAMS folder; `host_pattern` is a regex over `host_name`.
pub fn jams_dashboard(folder: &str, host_pattern: &str, metrics: &DataSource) -> Dashboard {
    let folder_lower = folder.to_lowercase();
    let mut dashboard = Dashboard::new(
        format!("JAMS Service Dashboard - {folder}"),
        vec!["jams".to_string(), "DAC".to_string(), folder_lower.clone()],
        "production",
        format!("jams-{folder_lower}"),
        vec![
            infrastructure_section("Infrastructure Metrics", metrics),
            jams_metrics_section("JAMS Metrics", folder, metrics),
        ],
    );
    dashboard.add_dashboard_variable(
        HOSTNAME_VARIABLE,
        format!(r#"label_values(system_cpu_utilization{{host_name=~"{host_pattern}"}}, host_name)"#),
        true,
        true,
        metrics.clone(),
    );
    dashboard
}

pub fn jams_metrics_section(title: &str, folder: &str, metrics: &DataSource) -> Section {
    let mut panel = Panel::bar_gauge("Exit Severity (JAMS)", metrics.clone())
        .with_unit(units::NONE)
        .with_orientation(Orientation::Horizontal)
        .with_query(Query::prometheus(
            format!(
                r#"sum by(exit_severity) (sum_over_time(jams_exit_severity_total{{folder="{folder}"}}[$__range]))"#
            ),
            metrics.clone(),
        ));

    for (severity, color) in SEVERITY_COLORS {
        panel = panel.with_override(
            FieldOverride::by_name(severity)
                .with_property("color", json!({"mode": "fixed", "fixedColor": color})),
        );
    }

    Section::new(title).with_panel(panel)
}
