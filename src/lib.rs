pub mod app;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod hash;
pub mod ident;
pub mod logger;
pub mod logging;
pub mod migrations;
pub mod models;
pub mod routing;
pub mod store;
pub mod testing;
pub mod views;

pub use app::App;
pub use config::Config;
pub use error::TrapError;
pub use logger::{EventLogger, EventRecord};
pub use store::{ContentStore, StoredFile};
