// Section domain model
use super::panel::Panel;

/// A titled row followed by its panels.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            panels: Vec::new(),
        }
    }

    pub fn add_panel(&mut self, panel: Panel) -> &mut Self {
        self.panels.push(panel);
        self
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }
}
