// Data source references
use serde::{Deserialize, Serialize};

/// A reference to a Grafana data source, as `{type, uid}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub uid: String,
}

impl DataSource {
    pub fn new(kind: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            uid: uid.into(),
        }
    }

    pub fn prometheus(uid: impl Into<String>) -> Self {
        Self::new("prometheus", uid)
    }

    pub fn loki(uid: impl Into<String>) -> Self {
        Self::new("loki", uid)
    }

    pub fn tempo(uid: impl Into<String>) -> Self {
        Self::new("tempo", uid)
    }

    /// The built-in data source Grafana uses for panels mixing several sources.
    pub fn mixed() -> Self {
        Self::new("datasource", "-- Mixed --")
    }
}

/// The well-known data sources the presets target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataSources {
    pub metrics: DataSource,
    pub logs: DataSource,
    pub traces: DataSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_kind_as_type() {
        let json = serde_json::to_value(DataSource::prometheus("abc")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "prometheus", "uid": "abc"}));
    }

    #[test]
    fn test_mixed_source() {
        let mixed = DataSource::mixed();
        assert_eq!(mixed.kind, "datasource");
        assert_eq!(mixed.uid, "-- Mixed --");
    }
}
