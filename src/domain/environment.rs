// Deployment environment selectors
use serde::Deserialize;
use std::fmt;

/// The environment a dashboard is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentEnv {
    Prod,
    Nonprod,
}

impl DeploymentEnv {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentEnv::Prod => "prod",
            DeploymentEnv::Nonprod => "nonprod",
        }
    }

    /// Label matcher for Prometheus and Loki queries.
    pub fn label_selector(&self) -> &'static str {
        match self {
            DeploymentEnv::Prod => r#"deployment_environment=~".*_PROD$|Prod""#,
            DeploymentEnv::Nonprod => r#"deployment_environment!~".*_PROD$|Prod""#,
        }
    }

    /// Attribute matcher for TraceQL, which uses dotted attribute names.
    pub fn trace_selector(&self) -> &'static str {
        match self {
            DeploymentEnv::Prod => r#"deployment.environment=~".*_PROD$|Prod""#,
            DeploymentEnv::Nonprod => r#"deployment.environment!~".*_PROD$|Prod""#,
        }
    }
}

impl fmt::Display for DeploymentEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors_differ_by_match_operator() {
        assert!(DeploymentEnv::Prod.label_selector().contains("=~"));
        assert!(DeploymentEnv::Nonprod.label_selector().contains("!~"));
        assert!(DeploymentEnv::Prod.trace_selector().starts_with("deployment.environment"));
    }

    #[test]
    fn test_deserialize_lowercase() {
        let env: DeploymentEnv = serde_json::from_str("\"nonprod\"").unwrap();
        assert_eq!(env, DeploymentEnv::Nonprod);
        assert_eq!(env.to_string(), "nonprod");
    }
}
