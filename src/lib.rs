mod config;
mod database;
mod models;
mod omdb;
mod web;

pub use config::Config;
pub use database::Database;
pub use omdb::OmdbClient;
pub use web::{AppState, routes};
