use crate::domain::ports::{LogSink, Transport, TransportReply};
use crate::domain::request::TransactionRequest;
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::Level;

type Outcome = Result<TransportReply, TransportError>;

/// A transport that answers from a script instead of the network.
///
/// Replies are handed out in the order they were pushed, and every request
/// is recorded so tests can inspect exactly what would have been sent. The
/// request at index n of [`ScriptedTransport::requests`] received the n-th
/// reply, also under concurrent callers.
/// `Clone` shares the script and the record.
#[derive(Default, Clone)]
pub struct ScriptedTransport {
    outcomes: Arc<RwLock<VecDeque<Outcome>>>,
    requests: Arc<RwLock<Vec<TransactionRequest>>>,
}

impl ScriptedTransport {
    /// Creates a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_reply(&self, reply: TransportReply) {
        self.outcomes.write().await.push_back(Ok(reply));
    }

    pub async fn push_failure(&self, error: TransportError) {
        self.outcomes.write().await.push_back(Err(error));
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<TransactionRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn process_msg(&self, request: &TransactionRequest) -> Result<TransportReply, TransportError> {
        // Held while recording so requests and replies pair up.
        let mut outcomes = self.outcomes.write().await;
        self.requests.write().await.push(request.clone());

        outcomes.pop_front().unwrap_or_else(|| {
            Err(TransportError::Unreachable {
                url: "memory://scripted".to_string(),
                reason: "no scripted reply left".to_string(),
            })
        })
    }
}

/// Keeps every diagnostic line in memory.
#[derive(Default, Clone)]
pub struct MemoryLogSink {
    entries: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|(_, message)| message)
            .collect()
    }
}

impl LogSink for MemoryLogSink {
    fn log(&self, level: Level, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}
