// ampliwatch-core: Polling and projection layer between ampliwatch-api and consumers.

pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod topology;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::RouterConfig;
pub use error::CoreError;
pub use monitor::{RouterMonitor, Snapshot};

// Re-export model types at the crate root for ergonomics.
pub use model::{EthernetDevice, EthernetPort, MacAddress, WAN_PORT, WanSpeeds, WifiDevice};
