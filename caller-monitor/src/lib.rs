pub mod actions;
pub mod config;
pub mod database;
pub mod handlers;
pub mod helpers;
pub mod log_stream;
pub mod monitor;
pub mod receiver;
pub mod repository;

pub use database::Database;
pub use repository::CallerRepository;
