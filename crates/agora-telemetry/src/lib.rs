//! # Agora Telemetry
//!
//! Structured logging setup shared by every Agora-Chain subsystem.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agora_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_telemetry(&config).expect("failed to init telemetry");
//!
//!     // tracing events are now collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AGORA_SERVICE_NAME` | `agora-chain` | Service name in log output |
//! | `AGORA_SUBSYSTEM_ID` | `00` | Subsystem identifier |
//! | `AGORA_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `AGORA_JSON_LOGS` | auto | JSON output (on inside containers) |

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{init_telemetry, TelemetryError};
