use thiserror::Error;

/// Failures raised while talking to the gateway over the wire.
///
/// These never carry a gateway result code: a reply that made it back is
/// interpreted by the response message, not here.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Gateway unreachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },
    #[error("Gateway at {url} did not answer within {seconds}s")]
    Timeout { url: String, seconds: u64 },
    #[error("Gateway returned HTTP {status}")]
    Http { status: u16 },
    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },
    #[error("Malformed gateway reply: {0}")]
    MalformedReply(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
}

#[derive(Error, Debug)]
pub enum PaymentError {
    /// The gateway answered with an `ERROR` result.
    #[error("Gateway error {code}: {message}")]
    Gateway { message: String, code: i64 },
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaymentError {
    /// The gateway message number for `Gateway` errors.
    pub fn gateway_code(&self) -> Option<i64> {
        match self {
            Self::Gateway { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True when the failure happened before or during the round trip,
    /// i.e. the gateway never produced a usable reply.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
