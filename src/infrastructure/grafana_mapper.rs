// Mapper to convert domain models to the Grafana dashboard model
use crate::domain::dashboard::Dashboard;
use crate::domain::panel::{
    FieldOverride, OverrideMatcher, Panel, PanelKind, ScaleDistribution, Transformation,
};
use crate::domain::query::{Query, QueryLanguage};
use crate::domain::variable::Variable;
use crate::infrastructure::grafana_model::{
    DashboardModel, FieldConfig, FieldDefaults, GridPos, MatcherModel, OverrideModel, PanelEntry,
    PanelModel, PropertyModel, QueryVariableModel, RowModel, SCHEMA_VERSION, TargetModel,
    Templating, TimeRange, TransformationModel,
};
use serde_json::{json, Map, Value};

const GRID_WIDTH: u32 = 24;
const PANEL_WIDTH: u32 = 12;
const PANEL_HEIGHT: u32 = 8;

pub fn dashboard_to_grafana(dashboard: &Dashboard) -> DashboardModel {
    let mut layout = Layout::default();
    let mut panels = Vec::new();

    for section in &dashboard.sections {
        panels.push(PanelEntry::Row(RowModel {
            kind: "row".to_string(),
            id: layout.next_id(),
            title: section.title.clone(),
            collapsed: false,
            grid_pos: layout.row(),
            panels: Vec::new(),
        }));

        for panel in &section.panels {
            let id = layout.next_id();
            let grid_pos = layout.panel();
            panels.push(PanelEntry::Panel(panel_to_grafana(panel, id, grid_pos)));
        }
    }

    DashboardModel {
        uid: dashboard.uid(),
        title: dashboard.title.clone(),
        tags: dashboard.tags.clone(),
        timezone: "browser".to_string(),
        editable: true,
        refresh: dashboard.refresh.clone(),
        time: TimeRange {
            from: dashboard.time_from.clone(),
            to: dashboard.time_to.clone(),
        },
        schema_version: SCHEMA_VERSION,
        panels,
        templating: Templating {
            list: dashboard.variables().iter().map(variable_to_grafana).collect(),
        },
    }
}

fn panel_to_grafana(panel: &Panel, id: u32, grid_pos: GridPos) -> PanelModel {
    let mut options = Map::new();
    let mut custom = Map::new();

    match panel.kind {
        PanelKind::Timeseries => {
            custom.insert(
                "scaleDistribution".to_string(),
                scale_distribution(panel.scale_distribution),
            );
        }
        PanelKind::BarChart => {
            let legend = panel.legend.clone().unwrap_or_default();
            options.insert("stacking".to_string(), json!(panel.stacking.as_str()));
            options.insert(
                "legend".to_string(),
                json!({
                    "showLegend": legend.show_legend,
                    "placement": legend.placement,
                    "displayMode": legend.display_mode,
                    "calcs": [],
                }),
            );
        }
        PanelKind::BarGauge => {
            options.insert("orientation".to_string(), json!(panel.orientation.as_str()));
            options.insert("displayMode".to_string(), json!(panel.display_mode.as_str()));
        }
        PanelKind::Table | PanelKind::Heatmap | PanelKind::Histogram => {}
    }

    if let Some(reduce) = &panel.reduce_options {
        options.insert(
            "reduceOptions".to_string(),
            json!({
                "values": reduce.values,
                "calcs": reduce.calcs,
                "fields": reduce.fields,
            }),
        );
    }

    PanelModel {
        kind: panel.kind.as_str().to_string(),
        id,
        title: panel.title.clone(),
        datasource: panel.datasource.clone(),
        grid_pos,
        targets: panel
            .queries
            .iter()
            .enumerate()
            .map(|(idx, query)| query_to_target(query, ref_id(idx)))
            .collect(),
        field_config: FieldConfig {
            defaults: FieldDefaults {
                unit: panel.unit.clone(),
                custom,
            },
            overrides: panel.overrides.iter().map(override_to_grafana).collect(),
        },
        options,
        transformations: panel
            .transformations
            .iter()
            .map(transformation_to_grafana)
            .collect(),
    }
}

fn scale_distribution(scale: ScaleDistribution) -> Value {
    match scale {
        ScaleDistribution::Linear => json!({"type": "linear"}),
        ScaleDistribution::Log(base) => json!({"type": "log", "log": base}),
    }
}

fn query_to_target(query: &Query, ref_id: String) -> TargetModel {
    let expr = query.expr.trim().to_string();
    let mut target = TargetModel {
        ref_id,
        datasource: query.datasource.clone(),
        expr: None,
        legend_format: None,
        format: None,
        query: None,
        query_type: None,
    };

    match query.language {
        QueryLanguage::Prometheus => {
            target.expr = Some(expr);
            target.legend_format = Some(query.legend.clone());
            target.format = Some(query.format.as_str().to_string());
        }
        QueryLanguage::Loki => {
            target.expr = Some(expr);
        }
        QueryLanguage::Tempo => {
            target.query = Some(expr);
            target.query_type = Some("traceql".to_string());
        }
    }

    target
}

fn override_to_grafana(field_override: &FieldOverride) -> OverrideModel {
    let (id, options) = match &field_override.matcher {
        OverrideMatcher::QueryRef(ref_id) => ("byFrameRefID", ref_id.clone()),
        OverrideMatcher::FieldName(name) => ("byName", name.clone()),
    };

    OverrideModel {
        matcher: MatcherModel {
            id: id.to_string(),
            options,
        },
        properties: field_override
            .properties
            .iter()
            .map(|(id, value)| PropertyModel {
                id: id.clone(),
                value: value.clone(),
            })
            .collect(),
    }
}

fn transformation_to_grafana(transformation: &Transformation) -> TransformationModel {
    TransformationModel {
        id: transformation.id.clone(),
        options: transformation.options.clone(),
    }
}

fn variable_to_grafana(variable: &Variable) -> QueryVariableModel {
    QueryVariableModel {
        kind: "query".to_string(),
        name: variable.name.clone(),
        datasource: variable.datasource.clone(),
        query: variable.query.clone(),
        multi: variable.multi_select,
        include_all: variable.include_all,
        allow_custom_value: false,
        refresh: 1,
    }
}

/// Query ref ids: A..Z, then AA, AB, ...
pub fn ref_id(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push((b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Places rows at full width and panels two to a line.
#[derive(Debug, Default)]
struct Layout {
    x: u32,
    y: u32,
    line_height: u32,
    last_id: u32,
}

impl Layout {
    fn next_id(&mut self) -> u32 {
        self.last_id += 1;
        self.last_id
    }

    fn row(&mut self) -> GridPos {
        self.finish_line();
        let pos = GridPos {
            h: 1,
            w: GRID_WIDTH,
            x: 0,
            y: self.y,
        };
        self.y += 1;
        pos
    }

    fn panel(&mut self) -> GridPos {
        if self.x + PANEL_WIDTH > GRID_WIDTH {
            self.finish_line();
        }
        let pos = GridPos {
            h: PANEL_HEIGHT,
            w: PANEL_WIDTH,
            x: self.x,
            y: self.y,
        };
        self.x += PANEL_WIDTH;
        self.line_height = self.line_height.max(PANEL_HEIGHT);
        pos
    }

    fn finish_line(&mut self) {
        if self.x > 0 {
            self.y += self.line_height;
            self.x = 0;
            self.line_height = 0;
        }
    }
}
