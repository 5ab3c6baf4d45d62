//! Adapters for the domain ports.

pub mod in_memory;
#[cfg(feature = "transport-soap")]
pub mod soap;
pub mod tracing_sink;
