use super::request::TransactionRequest;
use super::response::RawReply;
use crate::error::TransportError;
use async_trait::async_trait;
use tracing::Level;

/// What came back from one round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportReply {
    pub reply: RawReply,
    /// Trace of the exchange. May contain card numbers; mask before logging.
    pub debug_info: String,
}

/// Carries one request to the gateway and brings its reply back.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn process_msg(
        &self,
        request: &TransactionRequest,
    ) -> Result<TransportReply, TransportError>;
}

/// Receives diagnostics. Implementations must not fail or block the caller.
pub trait LogSink: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

pub type TransportBox = Box<dyn Transport>;
pub type LogSinkBox = Box<dyn LogSink>;
