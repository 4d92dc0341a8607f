pub mod app;
pub mod client;
pub mod config;
pub mod errors;
pub mod export;
pub mod form;
pub mod gate;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod table;
pub mod ui;

pub use app::router;
pub use client::{FetchError, RemoteClient};
pub use config::AppConfig;
pub use state::AppState;
pub use table::ResultTable;
