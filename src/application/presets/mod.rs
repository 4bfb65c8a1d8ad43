// Golden-path dashboard presets
pub mod jams;
pub mod network;
pub mod service;
