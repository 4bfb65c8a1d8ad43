// Application layer - Build and deploy use cases
pub mod dashboard_publisher;
pub mod dashboard_service;
pub mod presets;
pub mod validation;
