// Dashboard variable domain model
use super::datasource::DataSource;

/// A query-backed dashboard variable, usable in expressions as `$name`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub query: String,
    pub multi_select: bool,
    pub include_all: bool,
    pub datasource: DataSource,
}

impl Variable {
    pub fn new(
        name: String,
        query: String,
        multi_select: bool,
        include_all: bool,
        datasource: DataSource,
    ) -> Self {
        Self {
            name,
            query,
            multi_select,
            include_all,
            datasource,
        }
    }
}
