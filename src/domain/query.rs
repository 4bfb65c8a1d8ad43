// Query domain model
use super::datasource::DataSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryLanguage {
    Prometheus,
    Loki,
    Tempo,
}

/// How Grafana shapes a Prometheus result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFormat {
    TimeSeries,
    Table,
    Heatmap,
}

impl QueryFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryFormat::TimeSeries => "time_series",
            QueryFormat::Table => "table",
            QueryFormat::Heatmap => "heatmap",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub language: QueryLanguage,
    pub expr: String,
    pub datasource: DataSource,
    pub legend: String,
    pub format: QueryFormat,
}

impl Query {
    pub fn new(language: QueryLanguage, expr: impl Into<String>, datasource: DataSource) -> Self {
        Self {
            language,
            expr: expr.into(),
            datasource,
            legend: "__auto".to_string(),
            format: QueryFormat::TimeSeries,
        }
    }

    pub fn prometheus(expr: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(QueryLanguage::Prometheus, expr, datasource)
    }

    pub fn loki(expr: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(QueryLanguage::Loki, expr, datasource)
    }

    pub fn tempo(expr: impl Into<String>, datasource: DataSource) -> Self {
        Self::new(QueryLanguage::Tempo, expr, datasource)
    }

    pub fn with_legend(mut self, legend: impl Into<String>) -> Self {
        self.legend = legend.into();
        self
    }

    pub fn with_format(mut self, format: QueryFormat) -> Self {
        self.format = format;
        self
    }
}
