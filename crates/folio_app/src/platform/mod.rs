pub mod app;
pub mod confirm;
pub mod logging;
pub mod persistence;
pub mod plan;
