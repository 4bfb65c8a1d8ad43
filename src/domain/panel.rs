// Panel domain model
use super::datasource::DataSource;
use super::query::Query;
use serde_json::Value;

/// Grafana unit identifiers used by the presets.
pub mod units {
    pub const NONE: &str = "none";
    pub const PERCENT: &str = "percent";
    pub const PERCENT_UNIT: &str = "percentunit";
    pub const SECONDS: &str = "s";
    pub const MILLISECONDS: &str = "ms";
    pub const MEGABYTES_PER_SECOND: &str = "MBs";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Timeseries,
    BarChart,
    BarGauge,
    Table,
    Heatmap,
    Histogram,
}

impl PanelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Timeseries => "timeseries",
            PanelKind::BarChart => "barchart",
            PanelKind::BarGauge => "bargauge",
            PanelKind::Table => "table",
            PanelKind::Heatmap => "heatmap",
            PanelKind::Histogram => "histogram",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackingMode {
    None,
    Normal,
    Percent,
}

impl StackingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StackingMode::None => "none",
            StackingMode::Normal => "normal",
            StackingMode::Percent => "percent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Auto,
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Auto => "auto",
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Basic,
    Lcd,
    Gradient,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Basic => "basic",
            DisplayMode::Lcd => "lcd",
            DisplayMode::Gradient => "gradient",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleDistribution {
    Linear,
    Log(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendOptions {
    pub show_legend: bool,
    pub placement: String,
    pub display_mode: String,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self {
            show_legend: true,
            placement: "bottom".to_string(),
            display_mode: "list".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReduceOptions {
    pub values: bool,
    pub calcs: Vec<String>,
    pub fields: String,
}

/// A panel data transformation, e.g. `groupBy` or `sortBy`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformation {
    pub id: String,
    pub options: Value,
}

impl Transformation {
    pub fn new(id: impl Into<String>, options: Value) -> Self {
        Self {
            id: id.into(),
            options,
        }
    }
}

/// Which fields a [`FieldOverride`] applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideMatcher {
    QueryRef(String),
    FieldName(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldOverride {
    pub matcher: OverrideMatcher,
    pub properties: Vec<(String, Value)>,
}

impl FieldOverride {
    pub fn by_query_ref(ref_id: impl Into<String>) -> Self {
        Self {
            matcher: OverrideMatcher::QueryRef(ref_id.into()),
            properties: Vec::new(),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            matcher: OverrideMatcher::FieldName(name.into()),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((id.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: String,
    pub datasource: DataSource,
    pub kind: PanelKind,
    pub queries: Vec<Query>,
    pub unit: String,
    pub stacking: StackingMode,
    pub orientation: Orientation,
    pub display_mode: DisplayMode,
    pub scale_distribution: ScaleDistribution,
    pub legend: Option<LegendOptions>,
    pub reduce_options: Option<ReduceOptions>,
    pub transformations: Vec<Transformation>,
    pub overrides: Vec<FieldOverride>,
}

impl Panel {
    pub fn new(title: impl Into<String>, kind: PanelKind, datasource: DataSource) -> Self {
        Self {
            title: title.into(),
            datasource,
            kind,
            queries: Vec::new(),
            unit: units::NONE.to_string(),
            stacking: StackingMode::None,
            orientation: Orientation::Auto,
            display_mode: DisplayMode::Basic,
            scale_distribution: ScaleDistribution::Linear,
            legend: None,
            reduce_options: None,
            transformations: Vec::new(),
            overrides: Vec::new(),
        }
    }

    pub fn timeseries(title: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(title, PanelKind::Timeseries, datasource)
    }

    pub fn bar_chart(title: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(title, PanelKind::BarChart, datasource)
    }

    pub fn bar_gauge(title: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(title, PanelKind::BarGauge, datasource)
    }

    pub fn table(title: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(title, PanelKind::Table, datasource)
    }

    pub fn heatmap(title: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(title, PanelKind::Heatmap, datasource)
    }

    pub fn histogram(title: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(title, PanelKind::Histogram, datasource)
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.queries.push(query);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_stacking(mut self, stacking: StackingMode) -> Self {
        self.stacking = stacking;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_display_mode(mut self, display_mode: DisplayMode) -> Self {
        self.display_mode = display_mode;
        self
    }

    pub fn with_scale_distribution(mut self, scale: ScaleDistribution) -> Self {
        self.scale_distribution = scale;
        self
    }

    pub fn with_legend(mut self, legend: LegendOptions) -> Self {
        self.legend = Some(legend);
        self
    }

    pub fn with_reduce_options(mut self, reduce_options: ReduceOptions) -> Self {
        self.reduce_options = Some(reduce_options);
        self
    }

    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        self.transformations.push(transformation);
        self
    }

    pub fn with_override(mut self, field_override: FieldOverride) -> Self {
        self.overrides.push(field_override);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_grafana_defaults() {
        let panel = Panel::timeseries("Requests", DataSource::prometheus("m"));
        assert_eq!(panel.unit, "none");
        assert_eq!(panel.stacking, StackingMode::None);
        assert_eq!(panel.orientation, Orientation::Auto);
        assert_eq!(panel.display_mode, DisplayMode::Basic);
        assert_eq!(panel.scale_distribution, ScaleDistribution::Linear);
        assert!(panel.queries.is_empty());
    }

    #[test]
    fn test_override_collects_properties() {
        let field_override = FieldOverride::by_query_ref("B")
            .with_property("custom.axisPlacement", "right")
            .with_property("unit", units::PERCENT);

        assert_eq!(field_override.matcher, OverrideMatcher::QueryRef("B".to_string()));
        assert_eq!(field_override.properties.len(), 2);
        assert_eq!(field_override.properties[1].1, Value::from("percent"));
    }
}
