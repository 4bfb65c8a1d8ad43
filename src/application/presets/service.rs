// Standard service dashboard: summary, endpoints, hosts, runtime, traces, logs
use crate::domain::dashboard::Dashboard;
use crate::domain::datasource::{DataSource, DataSources};
use crate::domain::environment::DeploymentEnv;
use crate::domain::panel::{
    units, DisplayMode, FieldOverride, LegendOptions, Orientation, Panel, ReduceOptions,
    ScaleDistribution, StackingMode, Transformation,
};
use crate::domain::query::{Query, QueryFormat};
use crate::domain::section::Section;
use serde_json::json;

/// Name of the host variable the host-metrics panels filter on.
pub const HOSTNAME_VARIABLE: &str = "Hostname";

const LOG2: ScaleDistribution = ScaleDistribution::Log(2.0);

/// Assemble the standard dashboard for `service` and declare its `Hostname` variable.
pub fn service_dashboard(
    service: &str,
    env: DeploymentEnv,
    datasources: &DataSources,
    hostname_query: &str,
) -> Dashboard {
    let mut dashboard = Dashboard::new(
        format!("{} | {} | Service Dashboard", service, env),
        vec![service.to_string(), env.to_string(), "DAC".to_string()],
        env.as_str(),
        service,
        vec![
            service_summary_section("Service Summary", service, env, &datasources.metrics),
            endpoints_section("Endpoints", service, env, &datasources.metrics),
            infrastructure_section("Host Metrics", &datasources.metrics),
            runtime_section("Runtime Metrics", service, env, &datasources.metrics),
            traces_section("Traces", service, env, &datasources.traces),
            logs_section("Logs", service, env, &datasources.logs),
        ],
    );
    dashboard.add_dashboard_variable(
        HOSTNAME_VARIABLE,
        hostname_query,
        true,
        true,
        datasources.metrics.clone(),
    );
    dashboard
}

pub fn service_summary_section(
    title: &str,
    service: &str,
    env: DeploymentEnv,
    metrics: &DataSource,
) -> Section {
    let sel = env.label_selector();
    let client_filter = format!(
        r#"{sel}, server_address!~"127.0.0.1|localhost|169\\.[0-9]+\\.[0-9]+\\.[0-9]+", service_name="{service}""#
    );
    let latency = |quantile: &str| {
        Query::prometheus(
            format!(
                "histogram_quantile({quantile}, sum by (le, service_name) (increase(http_server_request_duration_bucket{{{sel}, service_name='{service}'}}[5m])))"
            ),
            metrics.clone(),
        )
    };

    Section::new(title)
        .with_panel(
            Panel::timeseries("Requests", metrics.clone()).with_query(Query::prometheus(
                format!(r#"sum(increase(http_server_request_duration_count{{{sel}, service_name="{service}"}}[5m]))"#),
                metrics.clone(),
            )),
        )
        .with_panel(
            Panel::bar_chart("Error Rate | 401's", metrics.clone()).with_query(Query::prometheus(
                format!(r#"sum by(http_response_status_code) (increase(http_server_request_duration_count{{{sel}, service_name="{service}", http_response_status_code=~"401"}}[5m]))"#),
                metrics.clone(),
            )),
        )
        .with_panel(
            Panel::bar_chart("Time Spent", metrics.clone())
                .with_unit(units::PERCENT_UNIT)
                .with_stacking(StackingMode::Percent)
                .with_legend(LegendOptions::default())
                .with_query(
                    Query::prometheus(
                        format!(
                            "sum by (server_address) (rate(http_client_request_duration_sum{{{client_filter}}}[5m])) / scalar(sum by () (rate(http_client_request_duration_sum{{{client_filter}}}[5m])))"
                        ),
                        metrics.clone(),
                    )
                    .with_legend("{{server_address}}"),
                ),
        )
        .with_panel(
            Panel::bar_gauge("Error Rate | 4xx, 5xx | Excluding 401's", metrics.clone())
                .with_orientation(Orientation::Horizontal)
                .with_display_mode(DisplayMode::Lcd)
                .with_query(Query::prometheus(
                    format!(r#"sum by(http_response_status_code) (increase(http_server_request_duration_count{{{sel}, service_name="{service}", http_response_status_code!~"2..|3..|1..|401"}}[5m]))"#),
                    metrics.clone(),
                )),
        )
        .with_panel(
            Panel::timeseries("Pxx Latency", metrics.clone())
                .with_unit(units::SECONDS)
                .with_scale_distribution(LOG2)
                .with_query(latency("0.75").with_legend("{{service_name}} - P75"))
                .with_query(latency("0.95").with_legend("{{service_name}} - P95"))
                .with_query(latency("0.50").with_legend("{{service_name}} - P50"))
                .with_query(latency("0.90").with_legend("{{service_name}} - P90")),
        )
}

pub fn endpoints_section(
    title: &str,
    service: &str,
    env: DeploymentEnv,
    metrics: &DataSource,
) -> Section {
    let filter = format!(r#"service_name='{service}', {}, http_route!="""#, env.label_selector());

    Section::new(title)
        .with_panel(
            Panel::timeseries("Requests", metrics.clone()).with_query(Query::prometheus(
                format!("sum by (http_route) (increase(http_server_request_duration_count{{{filter}}}[5m]))"),
                metrics.clone(),
            )),
        )
        .with_panel(
            Panel::timeseries("P95 Latency", metrics.clone())
                .with_unit(units::SECONDS)
                .with_scale_distribution(LOG2)
                .with_query(Query::prometheus(
                    format!("histogram_quantile(0.95, sum by(http_route,le) (increase(http_server_request_duration_bucket{{{filter}}}[5m])))"),
                    metrics.clone(),
                )),
        )
        .with_panel(route_totals_panel(
            "Requests Count By Route",
            units::NONE,
            format!("sum by (http_route) (increase(http_server_request_duration_count{{{filter}}}[5m]))"),
            metrics,
        ))
        .with_panel(route_totals_panel(
            "Requests Time Spent By Route",
            units::MILLISECONDS,
            format!("sum by (http_route) (increase(http_server_request_duration_sum{{{filter}}}[5m]))"),
            metrics,
        ))
}

/// Horizontal bar gauge of per-route sums, largest first.
fn route_totals_panel(title: &str, unit: &str, expr: String, metrics: &DataSource) -> Panel {
    Panel::bar_gauge(title, metrics.clone())
        .with_unit(unit)
        .with_orientation(Orientation::Horizontal)
        .with_display_mode(DisplayMode::Lcd)
        .with_reduce_options(ReduceOptions {
            values: true,
            calcs: vec!["sum".to_string()],
            fields: r"/^Value \(sum\)$/".to_string(),
        })
        .with_query(Query::prometheus(expr, metrics.clone()).with_format(QueryFormat::Table))
        .with_transformation(Transformation::new(
            "groupBy",
            json!({
                "fields": {
                    "Value": {"aggregations": ["sum"], "operation": "aggregate"},
                    "http_route": {"aggregations": ["sum"], "operation": "groupby"}
                }
            }),
        ))
        .with_transformation(Transformation::new(
            "sortBy",
            json!({"fields": {}, "sort": [{"desc": true, "field": "Value (sum)"}]}),
        ))
}

pub fn infrastructure_section(title: &str, metrics: &DataSource) -> Section {
    let host_panel = |title: &str, unit: &str, expr: &str, legend: &str| {
        Panel::timeseries(title, metrics.clone())
            .with_unit(unit)
            .with_scale_distribution(LOG2)
            .with_query(Query::prometheus(expr, metrics.clone()).with_legend(legend))
    };

    Section::new(title)
        .with_panel(
            Panel::timeseries("Memory Utilization", metrics.clone())
                .with_unit(units::PERCENT)
                .with_query(
                    Query::prometheus(
                        r#"system_memory_utilization{host_name=~'$Hostname', state!="free"} * 100"#,
                        metrics.clone(),
                    )
                    .with_legend("{{host_name}}"),
                ),
        )
        .with_panel(
            Panel::timeseries("CPU Utilization And Load", metrics.clone())
                .with_unit(units::PERCENT)
                .with_override(
                    FieldOverride::by_query_ref("A")
                        .with_property("custom.axisPlacement", "left")
                        .with_property("unit", units::PERCENT)
                        .with_property("custom.axisLabel", "CPU Utilization"),
                )
                .with_override(
                    FieldOverride::by_query_ref("B")
                        .with_property("custom.axisPlacement", "right")
                        .with_property("unit", units::PERCENT)
                        .with_property("custom.axisLabel", "CPU Load %"),
                )
                .with_query(
                    Query::prometheus(
                        r#"100 * sum by(host_name) (system_cpu_utilization{host_name=~"$Hostname", state!="idle"}) / ignoring(state) sum by(host_name) (system_cpu_utilization{host_name=~"$Hostname"})"#,
                        metrics.clone(),
                    )
                    .with_legend("{{host_name}} - Utilization"),
                )
                .with_query(
                    Query::prometheus(
                        r#"100 * sum(system_cpu_load_average_1m{host_name=~"$Hostname"}) by (host_name) / count(count by (host_name, cpu) (system_cpu_utilization{host_name=~"$Hostname"})) by (host_name)"#,
                        metrics.clone(),
                    )
                    .with_legend("{{host_name}} - Load"),
                ),
        )
        .with_panel(host_panel(
            "Network Bytes In",
            units::MEGABYTES_PER_SECOND,
            r#"rate(system_network_io{host_name=~'$Hostname', direction="receive", device!="Loopback Pseudo-Interface 1"}[5m]) / 1024 / 1024"#,
            "{{host_name}}",
        ))
        .with_panel(host_panel(
            "Network Bytes Out",
            units::MEGABYTES_PER_SECOND,
            r#"rate(system_network_io{host_name=~'$Hostname', direction="transmit", device!="Loopback Pseudo-Interface 1"}[5m]) / 1024 / 1024"#,
            "{{host_name}}",
        ))
        .with_panel(host_panel(
            "Disk I/O Read",
            units::MEGABYTES_PER_SECOND,
            r#"avg by (host_name, device) (rate(system_disk_io{host_name=~"$Hostname", direction="read"}[5m])) / 1024 / 1024"#,
            "{{device}} - {{host_name}}",
        ))
        .with_panel(host_panel(
            "Disk I/O Write",
            units::MEGABYTES_PER_SECOND,
            r#"avg by (host_name, device) (rate(system_disk_io{host_name=~"$Hostname", direction="write"}[5m])) / 1024 / 1024"#,
            "{{device}} - {{host_name}}",
        ))
        .with_panel(host_panel(
            "Disk I/O Time",
            units::SECONDS,
            r#"rate(system_disk_operation_time{host_name=~'$Hostname'}[5m])"#,
            "{{device}} - {{host_name}}",
        ))
}

pub fn runtime_section(
    title: &str,
    service: &str,
    env: DeploymentEnv,
    metrics: &DataSource,
) -> Section {
    let sel = env.label_selector();

    Section::new(title)
        .with_panel(
            Panel::timeseries("Thread Count", metrics.clone()).with_query(
                Query::prometheus(
                    format!(r#"sum by(host_name) (process_runtime_dotnet_thread_pool_threads_count{{service_name="{service}", {sel}}})"#),
                    metrics.clone(),
                )
                .with_legend("{{host_name}}"),
            ),
        )
        .with_panel(
            Panel::timeseries("Thread Contention", metrics.clone()).with_query(
                Query::prometheus(
                    format!(r#"sum by (host_name) (increase(process_runtime_dotnet_monitor_lock_contention_count{{service_name="{service}", {sel}}}[5m]))"#),
                    metrics.clone(),
                )
                .with_legend("{{host_name}}"),
            ),
        )
}

pub fn traces_section(
    title: &str,
    service: &str,
    env: DeploymentEnv,
    traces: &DataSource,
) -> Section {
    Section::new(title).with_panel(
        Panel::table("Traces", traces.clone()).with_query(Query::tempo(
            format!(
                r#"{{resource.service.name="{service}" && resource.{}}}"#,
                env.trace_selector()
            ),
            traces.clone(),
        )),
    )
}

pub fn logs_section(title: &str, service: &str, env: DeploymentEnv, logs: &DataSource) -> Section {
    Section::new(title).with_panel(
        Panel::table("Logs", logs.clone()).with_query(Query::loki(
            format!(r#"{{{}, service_name="{service}"}}"#, env.label_selector()),
            logs.clone(),
        )),
    )
}
