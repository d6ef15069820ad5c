pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod session;
pub mod uploads;
