// ── Domain model ──
//
// Typed projections of the router's topology response. Attribute maps
// stay as raw JSON because the firmware's key set varies by model and
// release; only the fields every consumer needs get first-class types.

pub mod device;
pub mod mac;
pub mod port;

pub use device::{EthernetDevice, WifiDevice};
pub use mac::MacAddress;
pub use port::{EthernetPort, WAN_PORT, WanSpeeds};
