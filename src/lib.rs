// src/lib.rs

pub mod adapters;
pub mod common;
pub mod config;
pub mod gateway;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use config::{AppConfig, AppState};
