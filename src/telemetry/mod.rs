pub mod http;
pub mod init;
pub mod metrics;

pub use http::{HttpMakeSpan, HttpOnResponse};
pub use init::{TelemetryGuard, init_telemetry};
