// Domain layer - Dashboard object model
pub mod dashboard;
pub mod datasource;
pub mod environment;
pub mod error;
pub mod panel;
pub mod query;
pub mod section;
pub mod variable;
