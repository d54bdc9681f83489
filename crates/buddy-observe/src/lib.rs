//! Observability setup for Buddy: structured logging via `tracing`, with an
//! optional OpenTelemetry span bridge.

pub mod tracing_setup;
