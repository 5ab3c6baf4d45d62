use crate::config::GatewayConfig;
use crate::domain::masking::mask_card_numbers;
use crate::domain::payment::{Amount, Pan};
use crate::domain::ports::{LogSinkBox, TransportBox, TransportReply};
use crate::domain::request::{
    AuthorizationBody, ConfirmationBody, RejectionBody, TransactionRequest,
};
use crate::domain::response::TransactionResponse;
use crate::error::Result;
use tracing::Level;

/// The main entry point for talking to the card gateway.
///
/// `Gateway` runs the authorise / confirm / reject exchange. It owns the
/// configuration, the transport and an optional diagnostics sink, and keeps
/// no state between calls: the [`TransactionResponse`] returned by
/// [`Gateway::authorise`] is the only handle to a transaction.
pub struct Gateway {
    config: GatewayConfig,
    transport: TransportBox,
    log_sink: Option<LogSinkBox>,
}

impl Gateway {
    /// Creates a new `Gateway` without a diagnostics sink.
    ///
    /// # Arguments
    ///
    /// * `config` - Credentials for the system and merchant account.
    /// * `transport` - Carries requests to the gateway.
    pub fn new(config: GatewayConfig, transport: TransportBox) -> Self {
        Self {
            config,
            transport,
            log_sink: None,
        }
    }

    /// Sends masked exchange diagnostics to `sink` after every call.
    pub fn with_log_sink(mut self, sink: LogSinkBox) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Authorises a card payment.
    ///
    /// Declines, referrals and other unfavourable outcomes come back as a
    /// normal response; only an `ERROR` result is returned as an error.
    pub async fn authorise(
        &self,
        pan: Pan,
        csc: &str,
        expiry_date: &str,
        amount: Amount,
        merchant_reference: &str,
    ) -> Result<TransactionResponse> {
        let body = AuthorizationBody::new(&self.config.merchant, pan, csc, expiry_date, amount)
            .with_merchant_reference(merchant_reference);
        let request = TransactionRequest::authorization(&self.config.system.credentials, body);

        self.send(&request).await
    }

    /// Confirms a transaction previously returned by [`Gateway::authorise`].
    pub async fn confirm(&self, authorised: &TransactionResponse) -> Result<TransactionResponse> {
        let request = TransactionRequest::confirmation(
            &self.config.system.credentials,
            ConfirmationBody::for_response(authorised),
        );

        self.send(&request).await
    }

    /// Rejects a transaction previously returned by [`Gateway::authorise`].
    pub async fn reject(
        &self,
        authorised: &TransactionResponse,
        pan: Pan,
    ) -> Result<TransactionResponse> {
        let request = TransactionRequest::rejection(
            &self.config.system.credentials,
            RejectionBody::for_response(authorised, pan),
        );

        self.send(&request).await
    }

    async fn send(&self, request: &TransactionRequest) -> Result<TransactionResponse> {
        tracing::debug!(
            msg_type = request.message_type().as_str(),
            processing_db = request.processing_db(),
            "Sending gateway request"
        );

        let TransportReply { reply, debug_info } = self.transport.process_msg(request).await?;
        let response = TransactionResponse::new(reply);

        // ERROR replies are logged as well.
        self.log_diagnostics(&debug_info);

        response
    }

    fn log_diagnostics(&self, debug_info: &str) {
        if let Some(sink) = &self.log_sink {
            sink.log(Level::INFO, &mask_card_numbers(debug_info));
        }
    }
}
