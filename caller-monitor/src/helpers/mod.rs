pub mod database;
pub mod services;
