// carewatch-api: Async Rust client for the CareWatch monitoring backend REST API

pub mod alarms;
pub mod auth;
pub mod cards;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::CareClient;
pub use error::Error;
