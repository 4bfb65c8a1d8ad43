// Error types surfaced by build and deploy
use thiserror::Error;

/// A `$name` reference that no dashboard variable declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndeclaredVariable {
    pub section: String,
    pub panel: String,
    pub query: String,
    pub variable: String,
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "queries reference undeclared dashboard variables {}; declared variables: {}\n{}",
        format_names(.missing),
        format_declared(.declared),
        format_references(.missing)
    )]
    UndeclaredVariables {
        missing: Vec<UndeclaredVariable>,
        declared: Vec<String>,
    },

    #[error("failed to serialize dashboard: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BuildError {
    /// Names of the undeclared variables, deduplicated, in first-seen order.
    pub fn undeclared_names(&self) -> Vec<&str> {
        match self {
            BuildError::UndeclaredVariables { missing, .. } => unique_names(missing),
            BuildError::Serialize(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("GRAFANA_API_KEY is not set")]
    MissingApiKey,

    #[error("request to Grafana failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Grafana rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid folder selection: {0}")]
    InvalidFolder(String),

    #[error("failed to read folder selection: {0}")]
    Prompt(#[from] std::io::Error),

    #[error(transparent)]
    Build(#[from] BuildError),
}

fn unique_names(missing: &[UndeclaredVariable]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for reference in missing {
        if !names.contains(&reference.variable.as_str()) {
            names.push(&reference.variable);
        }
    }
    names
}

fn format_names(missing: &[UndeclaredVariable]) -> String {
    format!("[{}]", unique_names(missing).join(", "))
}

fn format_declared(declared: &[String]) -> String {
    format!("[{}]", declared.join(", "))
}

fn format_references(missing: &[UndeclaredVariable]) -> String {
    missing
        .iter()
        .map(|r| {
            format!(
                "  section '{}', panel '{}': ${} in `{}`",
                r.section, r.panel, r.variable, r.query
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(panel: &str, variable: &str) -> UndeclaredVariable {
        UndeclaredVariable {
            section: "Host Metrics".to_string(),
            panel: panel.to_string(),
            query: format!("up{{host=~\"${}\"}}", variable),
            variable: variable.to_string(),
        }
    }

    #[test]
    fn test_message_lists_each_name_once() {
        let err = BuildError::UndeclaredVariables {
            missing: vec![reference("CPU", "Hostname"), reference("Memory", "Hostname")],
            declared: vec!["Host".to_string()],
        };

        assert_eq!(err.undeclared_names(), vec!["Hostname"]);
        let message = err.to_string();
        assert!(message.contains("[Hostname]"));
        assert!(message.contains("declared variables: [Host]"));
        assert!(message.contains("panel 'Memory'"));
    }
}
