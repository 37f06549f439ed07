pub mod auth;
pub mod authz;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod scheduling;
pub mod services;
