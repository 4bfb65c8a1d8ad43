// Branch network monitoring dashboard: ping RTT heatmaps and histograms
use crate::domain::dashboard::Dashboard;
use crate::domain::datasource::DataSource;
use crate::domain::panel::Panel;
use crate::domain::query::{Query, QueryFormat};
use crate::domain::section::Section;

const DEVICES: [(&str, &str); 2] = [("Switch", "switch"), ("vEdge", "vedge")];

pub fn network_dashboard(
    title: &str,
    tags: Vec<String>,
    service: &str,
    env: &str,
    metrics: &DataSource,
) -> Dashboard {
    Dashboard::new(
        title,
        tags,
        env,
        service,
        vec![
            heatmap_section("Network Monitoring Heatmaps", metrics),
            histogram_section("Ping Statistics Histograms", metrics),
        ],
    )
}

pub fn heatmap_section(title: &str, metrics: &DataSource) -> Section {
    let mut section = Section::new(title);
    for (label, device) in DEVICES {
        section.add_panel(
            Panel::heatmap(format!("Ping RTT - {label}"), metrics.clone()).with_query(
                Query::prometheus(
                    format!(r#"sort(sum by(le) (ping_rtt_bucket{{le!="+Inf", device_name="{device}"}}))"#),
                    metrics.clone(),
                )
                .with_format(QueryFormat::Heatmap),
            ),
        );
    }
    section
}

pub fn histogram_section(title: &str, metrics: &DataSource) -> Section {
    let mut section = Section::new(title);
    for (label, device) in DEVICES {
        section.add_panel(
            Panel::histogram(format!("Ping RTT - {label}"), metrics.clone()).with_query(
                Query::prometheus(
                    format!(r#"sort(sum by (le) (ping_rtt_bucket{{device_name="{device}"}}))"#),
                    metrics.clone(),
                )
                .with_format(QueryFormat::Heatmap),
            ),
        );
    }
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardService;
    use crate::domain::panel::PanelKind;

    #[test]
    fn test_network_dashboard_needs_no_variables() {
        let dashboard = network_dashboard(
            "Canada Branch Network Monitoring",
            vec!["snmp".to_string(), "DAC".to_string()],
            "snmp-monitoring",
            "production",
            &DataSource::prometheus("m"),
        );

        assert_eq!(dashboard.uid(), "snmp-monitoring-production-dashboard");
        assert!(dashboard.variables().is_empty());
        assert!(DashboardService::build(&dashboard).is_ok());
    }

    #[test]
    fn test_sections_cover_each_device() {
        let heatmaps = heatmap_section("Heatmaps", &DataSource::prometheus("m"));
        let histograms = histogram_section("Histograms", &DataSource::prometheus("m"));

        assert_eq!(heatmaps.panels.len(), 2);
        assert_eq!(heatmaps.panels[1].title, "Ping RTT - vEdge");
        assert!(heatmaps.panels[0].queries[0].expr.contains(r#"le!="+Inf""#));
        assert!(histograms.panels.iter().all(|p| p.kind == PanelKind::Histogram));
        assert!(histograms.panels[0].queries[0].expr.contains(r#"device_name="switch""#));
    }
}
