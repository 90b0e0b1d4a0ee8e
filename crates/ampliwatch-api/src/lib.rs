// ampliwatch-api: Async Rust client for the AmpliFi router's web management interface

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::RouterClient;
pub use error::Error;
pub use models::RawTopology;
pub use transport::TransportConfig;
