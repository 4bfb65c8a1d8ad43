// Declarative Grafana dashboards: build, validate, render and deploy
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
