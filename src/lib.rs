// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod animator;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod quote;
pub mod reconciler;
pub mod runtime;
pub mod session;
