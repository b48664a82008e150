pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod validation;

pub use server::{app, AppState};

#[cfg(test)]
pub mod testing;
