use crate::domain::payment::{Amount, Pan};
use crate::domain::response::TransactionResponse;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the integrating system to the gateway.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemCredentials {
    pub system_id: String,
    pub system_guid: String,
    pub passcode: String,
}

impl fmt::Debug for SystemCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemCredentials")
            .field("system_id", &self.system_id)
            .field("system_guid", &"<redacted>")
            .field("passcode", &"<redacted>")
            .finish()
    }
}

/// The merchant account a sale is charged to.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantCredentials {
    pub account_id: String,
    pub account_passcode: String,
}

impl fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("account_id", &self.account_id)
            .field("account_passcode", &"<redacted>")
            .finish()
    }
}

/// Wire message type, sent alongside the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Transaction,
    Confirmation,
    Rejection,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transaction => "TXN",
            Self::Confirmation => "CNF",
            Self::Rejection => "REJ",
        }
    }
}

/// Card-not-present sale details.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorizationBody {
    account_id: String,
    account_passcode: String,
    pan: Pan,
    csc: String,
    expiry_date: String,
    amount: Amount,
    merchant_reference: String,
}

impl AuthorizationBody {
    pub fn new(
        merchant: &MerchantCredentials,
        pan: Pan,
        csc: impl Into<String>,
        expiry_date: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            account_id: merchant.account_id.clone(),
            account_passcode: merchant.account_passcode.clone(),
            pan,
            csc: csc.into(),
            expiry_date: expiry_date.into(),
            amount,
            merchant_reference: String::new(),
        }
    }

    pub fn with_merchant_reference(mut self, reference: impl Into<String>) -> Self {
        self.merchant_reference = reference.into();
        self
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn account_passcode(&self) -> &str {
        &self.account_passcode
    }

    pub fn pan(&self) -> &Pan {
        &self.pan
    }

    pub fn csc(&self) -> &str {
        &self.csc
    }

    pub fn expiry_date(&self) -> &str {
        &self.expiry_date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn merchant_reference(&self) -> &str {
        &self.merchant_reference
    }
}

/// Commits an authorised transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationBody {
    transaction_id: i64,
    processing_db: String,
}

impl ConfirmationBody {
    /// Only a prior response can be confirmed.
    pub fn for_response(response: &TransactionResponse) -> Self {
        Self {
            transaction_id: response.transaction_id(),
            processing_db: response.processing_db().to_string(),
        }
    }

    pub fn transaction_id(&self) -> i64 {
        self.transaction_id
    }

    pub fn processing_db(&self) -> &str {
        &self.processing_db
    }
}

/// Voids an authorised transaction. The PAN lets the gateway verify the
/// caller holds the card that was authorised; nothing is charged.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectionBody {
    transaction_id: i64,
    processing_db: String,
    pan: Pan,
}

impl RejectionBody {
    pub fn for_response(response: &TransactionResponse, pan: Pan) -> Self {
        Self {
            transaction_id: response.transaction_id(),
            processing_db: response.processing_db().to_string(),
            pan,
        }
    }

    pub fn transaction_id(&self) -> i64 {
        self.transaction_id
    }

    pub fn processing_db(&self) -> &str {
        &self.processing_db
    }

    pub fn pan(&self) -> &Pan {
        &self.pan
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Authorization(AuthorizationBody),
    Confirmation(ConfirmationBody),
    Rejection(RejectionBody),
}

impl RequestBody {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::Authorization(_) => MessageType::Transaction,
            Self::Confirmation(_) => MessageType::Confirmation,
            Self::Rejection(_) => MessageType::Rejection,
        }
    }
}

/// A request ready to hand to a [`Transport`](crate::domain::ports::Transport).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    system: SystemCredentials,
    body: RequestBody,
}

impl TransactionRequest {
    pub fn authorization(system: &SystemCredentials, body: AuthorizationBody) -> Self {
        Self {
            system: system.clone(),
            body: RequestBody::Authorization(body),
        }
    }

    pub fn confirmation(system: &SystemCredentials, body: ConfirmationBody) -> Self {
        Self {
            system: system.clone(),
            body: RequestBody::Confirmation(body),
        }
    }

    pub fn rejection(system: &SystemCredentials, body: RejectionBody) -> Self {
        Self {
            system: system.clone(),
            body: RequestBody::Rejection(body),
        }
    }

    pub fn system(&self) -> &SystemCredentials {
        &self.system
    }

    /// The body to put on the wire.
    pub fn message(&self) -> &RequestBody {
        &self.body
    }

    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }

    /// Processing database the request is routed to. Authorizations let the
    /// gateway choose, so theirs is empty.
    pub fn processing_db(&self) -> &str {
        match &self.body {
            RequestBody::Authorization(_) => "",
            RequestBody::Confirmation(body) => body.processing_db(),
            RequestBody::Rejection(body) => body.processing_db(),
        }
    }
}
