// Dashboard domain model
use super::datasource::DataSource;
use super::section::Section;
use super::variable::Variable;

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub title: String,
    pub tags: Vec<String>,
    pub env: String,
    pub service: String,
    pub sections: Vec<Section>,
    pub time_from: String,
    pub time_to: String,
    pub refresh: String,
    variables: Vec<Variable>,
}

impl Dashboard {
    pub fn new(
        title: impl Into<String>,
        tags: Vec<String>,
        env: impl Into<String>,
        service: impl Into<String>,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            title: title.into(),
            tags,
            env: env.into(),
            service: service.into(),
            sections,
            time_from: "now-1h".to_string(),
            time_to: "now".to_string(),
            refresh: "10s".to_string(),
            variables: Vec::new(),
        }
    }

    pub fn uid(&self) -> String {
        format!("{}-{}-dashboard", self.service, self.env).to_lowercase()
    }

    pub fn with_time_range(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.time_from = from.into();
        self.time_to = to.into();
        self
    }

    pub fn with_refresh(mut self, refresh: impl Into<String>) -> Self {
        self.refresh = refresh.into();
        self
    }

    pub fn add_section(&mut self, section: Section) -> &mut Self {
        self.sections.push(section);
        self
    }

    /// First section with the given title.
    pub fn section_mut(&mut self, title: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.title == title)
    }

    /// Declares a variable; re-declaring a name replaces the earlier definition in place.
    pub fn add_dashboard_variable(
        &mut self,
        name: impl Into<String>,
        query: impl Into<String>,
        multi_select: bool,
        include_all: bool,
        data_source: DataSource,
    ) -> &mut Self {
        let variable = Variable::new(name.into(), query.into(), multi_select, include_all, data_source);
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => self.variables.push(variable),
        }
        self
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }
}
