// Grafana dashboard JSON model
use crate::domain::datasource::DataSource;
use serde::Serialize;
use serde_json::{Map, Value};

pub const SCHEMA_VERSION: u32 = 39;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardModel {
    pub uid: String,
    pub title: String,
    pub tags: Vec<String>,
    pub timezone: String,
    pub editable: bool,
    pub refresh: String,
    pub time: TimeRange,
    pub schema_version: u32,
    pub panels: Vec<PanelEntry>,
    pub templating: Templating,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

/// Rows and panels share the top-level `panels` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PanelEntry {
    Row(RowModel),
    Panel(PanelModel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridPos {
    pub h: u32,
    pub w: u32,
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u32,
    pub title: String,
    pub collapsed: bool,
    pub grid_pos: GridPos,
    pub panels: Vec<PanelModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: u32,
    pub title: String,
    pub datasource: DataSource,
    pub grid_pos: GridPos,
    pub targets: Vec<TargetModel>,
    pub field_config: FieldConfig,
    pub options: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<TransformationModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldConfig {
    pub defaults: FieldDefaults,
    pub overrides: Vec<OverrideModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefaults {
    pub unit: String,
    pub custom: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideModel {
    pub matcher: MatcherModel,
    pub properties: Vec<PropertyModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatcherModel {
    pub id: String,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyModel {
    pub id: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformationModel {
    pub id: String,
    pub options: Value,
}

/// A query target; only the fields of the target's language are set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetModel {
    pub ref_id: String,
    pub datasource: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Templating {
    pub list: Vec<QueryVariableModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryVariableModel {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub datasource: DataSource,
    pub query: String,
    pub multi: bool,
    pub include_all: bool,
    pub allow_custom_value: bool,
    /// 1 = refresh on dashboard load.
    pub refresh: u8,
}

/// Body of `POST /api/dashboards/db`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload<'a> {
    pub dashboard: &'a DashboardModel,
    pub folder_id: i64,
    pub overwrite: bool,
}

impl DashboardModel {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        to_sorted_json(self)
    }
}

impl DashboardPayload<'_> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        to_sorted_json(self)
    }
}

/// Pretty JSON with object keys sorted, so equal models encode to equal bytes.
fn to_sorted_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string_pretty(&sort_keys(value))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_omits_unset_fields() {
        let target = TargetModel {
            ref_id: "A".to_string(),
            datasource: DataSource::tempo("t"),
            expr: None,
            legend_format: None,
            format: None,
            query: Some("{}".to_string()),
            query_type: Some("traceql".to_string()),
        };

        let json = serde_json::to_value(&target).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert_eq!(json["refId"], "A");
        assert_eq!(json["queryType"], "traceql");
        assert!(json.get("expr").is_none());
    }

    #[test]
    fn test_sort_keys_is_recursive() {
        let value = serde_json::json!({"b": {"z": 1, "a": 2}, "a": [{"y": 1, "x": 2}]});
        let sorted = serde_json::to_string(&sort_keys(value)).unwrap();
        assert_eq!(sorted, r#"{"a":[{"x":2,"y":1}],"b":{"a":2,"z":1}}"#);
    }
}
