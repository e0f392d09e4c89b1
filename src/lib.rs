pub mod app;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod drilldown;
pub mod errors;
pub mod filters;
pub mod handlers;
pub mod kpis;
pub mod models;
pub mod records;
pub mod reports;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
