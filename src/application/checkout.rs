use crate::application::gateway::Gateway;
use crate::domain::payment::{Amount, Pan};
use crate::domain::response::TransactionResponse;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One card sale, as read from the command line or a batch file.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct ChargeRequest {
    pub pan: Pan,
    pub csc: String,
    pub expiry: String,
    pub amount: Amount,
    #[serde(default)]
    pub reference: String,
}

/// What was done after the authorisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    Confirmed,
    Rejected,
    /// Not authorised; nothing to confirm or reject.
    NotSettled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargeOutcome {
    pub authorisation: TransactionResponse,
    pub settlement: Settlement,
    /// Reply to the confirm or reject call, if one was made.
    pub follow_up: Option<TransactionResponse>,
}

impl ChargeOutcome {
    /// The last response the gateway gave for this sale.
    pub fn final_response(&self) -> &TransactionResponse {
        self.follow_up.as_ref().unwrap_or(&self.authorisation)
    }
}

/// Authorises a sale, then confirms it, or rejects it when the card
/// security code was required to match and did not.
pub async fn charge(
    gateway: &Gateway,
    request: ChargeRequest,
    require_cvc_match: bool,
) -> Result<ChargeOutcome> {
    let authorisation = gateway
        .authorise(
            request.pan.clone(),
            &request.csc,
            &request.expiry,
            request.amount,
            &request.reference,
        )
        .await?;

    if !(authorisation.is_authorised() || authorisation.is_approved()) {
        tracing::info!(
            result = %authorisation.txn_result(),
            transaction_id = authorisation.transaction_id(),
            "Authorisation not granted"
        );
        return Ok(ChargeOutcome {
            authorisation,
            settlement: Settlement::NotSettled,
            follow_up: None,
        });
    }

    let (settlement, follow_up) = if require_cvc_match && !authorisation.is_cvc_matched() {
        tracing::warn!(
            transaction_id = authorisation.transaction_id(),
            cvc = authorisation.cvc().describe(),
            "Rejecting transaction, security code did not match"
        );
        let rejected = gateway.reject(&authorisation, request.pan).await?;
        (Settlement::Rejected, rejected)
    } else {
        let confirmed = gateway.confirm(&authorisation).await?;
        (Settlement::Confirmed, confirmed)
    };

    Ok(ChargeOutcome {
        authorisation,
        settlement,
        follow_up: Some(follow_up),
    })
}
