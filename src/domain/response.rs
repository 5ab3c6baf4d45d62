use crate::domain::codes::{CvcResult, TxnResult, scheme_description};
use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};

/// Reply fields exactly as the gateway sends them.
///
/// Every field is optional: the gateway omits whatever does not apply to a
/// message, and the accessors on [`TransactionResponse`] fall back to the
/// zero value of their type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawReply {
    #[serde(rename = "transactionid")]
    pub transaction_id: Option<String>,
    #[serde(rename = "resultdatetimestring")]
    pub result_date_time: Option<String>,
    #[serde(rename = "processingdb")]
    pub processing_db: Option<String>,
    #[serde(rename = "errormsg")]
    pub error_msg: Option<String>,
    #[serde(rename = "merchantnumber")]
    pub merchant_number: Option<String>,
    pub tid: Option<String>,
    #[serde(rename = "schemename")]
    pub scheme_name: Option<String>,
    #[serde(rename = "messagenumber")]
    pub message_number: Option<String>,
    #[serde(rename = "authcode")]
    pub auth_code: Option<String>,
    #[serde(rename = "authmessage")]
    pub auth_message: Option<String>,
    #[serde(rename = "vrtel")]
    pub vr_tel: Option<String>,
    #[serde(rename = "txnresult")]
    pub txn_result: Option<String>,
    #[serde(rename = "pcavsresult")]
    pub pc_avs_result: Option<String>,
    #[serde(rename = "ad1avsresult")]
    pub ad1_avs_result: Option<String>,
    #[serde(rename = "cvcresult")]
    pub cvc_result: Option<String>,
    pub arc: Option<String>,
    #[serde(rename = "iadarc")]
    pub iad_arc: Option<String>,
    #[serde(rename = "iadoad")]
    pub iad_oad: Option<String>,
    pub isd: Option<String>,
    #[serde(rename = "authorisingentity")]
    pub authorising_entity: Option<String>,
}

impl RawReply {
    /// Stores `value` under the provider field `name`, ignoring case.
    /// Returns false for names that are not reply fields.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name.to_ascii_lowercase().as_str() {
            "transactionid" => &mut self.transaction_id,
            "resultdatetimestring" => &mut self.result_date_time,
            "processingdb" => &mut self.processing_db,
            "errormsg" => &mut self.error_msg,
            "merchantnumber" => &mut self.merchant_number,
            "tid" => &mut self.tid,
            "schemename" => &mut self.scheme_name,
            "messagenumber" => &mut self.message_number,
            "authcode" => &mut self.auth_code,
            "authmessage" => &mut self.auth_message,
            "vrtel" => &mut self.vr_tel,
            "txnresult" => &mut self.txn_result,
            "pcavsresult" => &mut self.pc_avs_result,
            "ad1avsresult" => &mut self.ad1_avs_result,
            "cvcresult" => &mut self.cvc_result,
            "arc" => &mut self.arc,
            "iadarc" => &mut self.iad_arc,
            "iadoad" => &mut self.iad_oad,
            "isd" => &mut self.isd,
            "authorisingentity" => &mut self.authorising_entity,
            _ => return false,
        };
        *slot = Some(value.into());
        true
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawReply {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut reply = Self::default();
        for (name, value) in iter {
            reply.set_field(name.as_ref(), value);
        }
        reply
    }
}

fn text(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or_default()
}

fn integer(field: &Option<String>) -> i64 {
    field
        .as_deref()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or_default()
}

/// A validated gateway reply.
///
/// Construction fails with [`PaymentError::Gateway`] when the gateway
/// reports an `ERROR` result, so a value of this type is never an error.
/// Any other result, favourable or not, is a normal response.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionResponse {
    raw: RawReply,
    result: TxnResult,
}

impl TransactionResponse {
    pub fn new(raw: RawReply) -> Result<Self> {
        let result = TxnResult::parse(text(&raw.txn_result));
        let response = Self { raw, result };
        response.check_for_errors()?;
        Ok(response)
    }

    fn check_for_errors(&self) -> Result<()> {
        if self.is_error() {
            return Err(PaymentError::Gateway {
                message: self.auth_message().to_string(),
                code: self.message_number(),
            });
        }
        Ok(())
    }

    pub fn transaction_id(&self) -> i64 {
        integer(&self.raw.transaction_id)
    }

    pub fn result_date_time(&self) -> &str {
        text(&self.raw.result_date_time)
    }

    pub fn processing_db(&self) -> &str {
        text(&self.raw.processing_db)
    }

    pub fn error_msg(&self) -> &str {
        text(&self.raw.error_msg)
    }

    pub fn merchant_number(&self) -> &str {
        text(&self.raw.merchant_number)
    }

    pub fn tid(&self) -> &str {
        text(&self.raw.tid)
    }

    /// Scheme code as sent by the gateway.
    pub fn scheme_code(&self) -> &str {
        text(&self.raw.scheme_name)
    }

    /// Human readable scheme, or the raw code when it is not in the table.
    pub fn scheme_name(&self) -> &str {
        scheme_description(self.scheme_code())
    }

    pub fn message_number(&self) -> i64 {
        integer(&self.raw.message_number)
    }

    pub fn auth_code(&self) -> &str {
        text(&self.raw.auth_code)
    }

    pub fn auth_message(&self) -> &str {
        text(&self.raw.auth_message)
    }

    pub fn vr_tel(&self) -> &str {
        text(&self.raw.vr_tel)
    }

    /// Upper-cased transaction result.
    pub fn txn_result(&self) -> &TxnResult {
        &self.result
    }

    pub fn pc_avs_result(&self) -> i64 {
        integer(&self.raw.pc_avs_result)
    }

    pub fn ad1_avs_result(&self) -> i64 {
        integer(&self.raw.ad1_avs_result)
    }

    pub fn cvc_result(&self) -> i64 {
        integer(&self.raw.cvc_result)
    }

    pub fn cvc(&self) -> CvcResult {
        CvcResult::from(self.cvc_result())
    }

    pub fn arc(&self) -> &str {
        text(&self.raw.arc)
    }

    pub fn iad_arc(&self) -> &str {
        text(&self.raw.iad_arc)
    }

    pub fn iad_oad(&self) -> &str {
        text(&self.raw.iad_oad)
    }

    pub fn isd(&self) -> &str {
        text(&self.raw.isd)
    }

    pub fn authorising_entity(&self) -> i64 {
        integer(&self.raw.authorising_entity)
    }

    pub fn is_error(&self) -> bool {
        self.result == TxnResult::Error
    }

    pub fn is_referral(&self) -> bool {
        self.result == TxnResult::Referral
    }

    pub fn is_declined(&self) -> bool {
        self.result == TxnResult::Declined
    }

    pub fn is_rejected(&self) -> bool {
        self.result == TxnResult::Rejected
    }

    pub fn is_charged(&self) -> bool {
        self.result == TxnResult::Charged
    }

    pub fn is_approved(&self) -> bool {
        self.result == TxnResult::Approved
    }

    pub fn is_authorised(&self) -> bool {
        self.result == TxnResult::Authorised
    }

    pub fn is_auth_only(&self) -> bool {
        self.result == TxnResult::AuthOnly
    }

    pub fn is_comms_down(&self) -> bool {
        self.result == TxnResult::CommsDown
    }

    pub fn is_cvc_not_provided(&self) -> bool {
        self.cvc_result() == 0
    }

    pub fn is_cvc_not_checked(&self) -> bool {
        self.cvc_result() == 1
    }

    pub fn is_cvc_matched(&self) -> bool {
        self.cvc_result() == 2
    }

    pub fn is_cvc_not_matched(&self) -> bool {
        self.cvc_result() == 4
    }

    /// Flat export of every field, for logging, storage or API output.
    pub fn snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot {
            transaction_id: self.transaction_id(),
            result_date_time_string: self.result_date_time().to_string(),
            processing_db: self.processing_db().to_string(),
            error_msg: self.error_msg().to_string(),
            merchant_number: self.merchant_number().to_string(),
            tid: self.tid().to_string(),
            scheme_name: self.scheme_name().to_string(),
            message_number: text(&self.raw.message_number).to_string(),
            auth_code: self.auth_code().to_string(),
            auth_message: self.auth_message().to_string(),
            vr_tel: self.vr_tel().to_string(),
            txn_result: self.result.as_str().to_string(),
            pc_avs_result: self.pc_avs_result(),
            ad1_avs_result: self.ad1_avs_result(),
            cvc_result: self.cvc_result(),
            arc: self.arc().to_string(),
            iad_arc: self.iad_arc().to_string(),
            iad_oad: self.iad_oad().to_string(),
            isd: self.isd().to_string(),
            authorising_entity: self.authorising_entity(),
        }
    }
}

impl TryFrom<RawReply> for TransactionResponse {
    type Error = PaymentError;

    fn try_from(raw: RawReply) -> Result<Self> {
        Self::new(raw)
    }
}

/// Every response field, typed and named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSnapshot {
    pub transaction_id: i64,
    pub result_date_time_string: String,
    pub processing_db: String,
    pub error_msg: String,
    pub merchant_number: String,
    pub tid: String,
    pub scheme_name: String,
    pub message_number: String,
    pub auth_code: String,
    pub auth_message: String,
    pub vr_tel: String,
    pub txn_result: String,
    pub pc_avs_result: i64,
    pub ad1_avs_result: i64,
    pub cvc_result: i64,
    pub arc: String,
    pub iad_arc: String,
    pub iad_oad: String,
    pub isd: String,
    pub authorising_entity: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(result: &str) -> RawReply {
        RawReply {
            txn_result: Some(result.to_string()),
            ..Default::default()
        }
    }

    fn predicates(response: &TransactionResponse) -> [bool; 9] {
        [
            response.is_error(),
            response.is_referral(),
            response.is_declined(),
            response.is_rejected(),
            response.is_charged(),
            response.is_approved(),
            response.is_authorised(),
            response.is_auth_only(),
            response.is_comms_down(),
        ]
    }

    #[test]
    fn test_error_result_fails_construction() {
        for result in ["ERROR", "error", "Error", "eRrOr"] {
            let raw = RawReply {
                auth_message: Some("Invalid card".to_string()),
                message_number: Some("42".to_string()),
                ..reply(result)
            };
            match TransactionResponse::new(raw) {
                Err(PaymentError::Gateway { message, code }) => {
                    assert_eq!(message, "Invalid card");
                    assert_eq!(code, 42);
                }
                other => panic!("expected gateway error for {result}, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_error_without_details_uses_zero_values() {
        let err = TransactionResponse::new(reply("ERROR")).unwrap_err();
        assert!(matches!(
            err,
            PaymentError::Gateway { ref message, code: 0 } if message.is_empty()
        ));
    }

    #[test]
    fn test_exactly_one_predicate_per_result() {
        let results = [
            "REFERRAL",
            "DECLINED",
            "REJECTED",
            "CHARGED",
            "APPROVED",
            "AUTHORISED",
            "AUTHONLY",
            "COMMSDOWN",
        ];
        for (index, result) in results.iter().enumerate() {
            let response = TransactionResponse::new(reply(&result.to_lowercase())).unwrap();
            let flags = predicates(&response);
            assert_eq!(flags.iter().filter(|flag| **flag).count(), 1, "{result}");
            // index 0 is is_error, which can never be observed
            assert!(flags[index + 1], "{result}");
        }
    }

    #[test]
    fn test_unknown_result_is_not_fatal() {
        let response = TransactionResponse::new(reply("Pending")).unwrap();
        assert!(predicates(&response).iter().all(|flag| !flag));
        assert_eq!(response.txn_result(), &TxnResult::Unknown("PENDING".to_string()));

        let empty = TransactionResponse::new(RawReply::default()).unwrap();
        assert!(predicates(&empty).iter().all(|flag| !flag));
    }

    #[test]
    fn test_cvc_predicates() {
        let cases: [(&str, [bool; 4]); 6] = [
            ("0", [true, false, false, false]),
            ("1", [false, true, false, false]),
            ("2", [false, false, true, false]),
            ("4", [false, false, false, true]),
            ("3", [false, false, false, false]),
            ("9", [false, false, false, false]),
        ];
        for (code, expected) in cases {
            let raw = RawReply {
                cvc_result: Some(code.to_string()),
                ..reply("AUTHORISED")
            };
            let response = TransactionResponse::new(raw).unwrap();
            assert_eq!(
                [
                    response.is_cvc_not_provided(),
                    response.is_cvc_not_checked(),
                    response.is_cvc_matched(),
                    response.is_cvc_not_matched(),
                ],
                expected,
                "cvc {code}"
            );
        }
    }

    #[test]
    fn test_missing_cvc_defaults_to_not_provided() {
        let response = TransactionResponse::new(reply("DECLINED")).unwrap();
        assert!(response.is_declined());
        assert_eq!(response.cvc_result(), 0);
        assert!(response.is_cvc_not_provided());
        assert_eq!(response.cvc(), CvcResult::NotProvided);
    }

    #[test]
    fn test_missing_and_garbage_fields_coerce_to_zero_values() {
        let raw = RawReply {
            transaction_id: Some("not-a-number".to_string()),
            ..reply("AUTHORISED")
        };
        let response = TransactionResponse::new(raw).unwrap();
        assert_eq!(response.transaction_id(), 0);
        assert_eq!(response.processing_db(), "");
        assert_eq!(response.authorising_entity(), 0);
        assert_eq!(response.tid(), "");
    }

    #[test]
    fn test_scheme_name_lookup() {
        let mut raw = reply("AUTHORISED");
        raw.scheme_name = Some("3".to_string());
        assert_eq!(
            TransactionResponse::new(raw.clone()).unwrap().scheme_name(),
            "MasterCard/MasterCard One"
        );
        raw.scheme_name = Some("12345".to_string());
        assert_eq!(TransactionResponse::new(raw).unwrap().scheme_name(), "12345");
    }

    #[test]
    fn test_set_field_ignores_case() {
        let raw: RawReply = [
            ("TransactionId", "77"),
            ("TXNRESULT", "charged"),
            ("CvcResult", "2"),
            ("unrelated", "x"),
        ]
        .into_iter()
        .collect();
        assert_eq!(raw.transaction_id.as_deref(), Some("77"));
        assert_eq!(raw.txn_result.as_deref(), Some("charged"));

        let mut other = RawReply::default();
        assert!(!other.set_field("unrelated", "x"));
        assert_eq!(other, RawReply::default());
    }

    #[test]
    fn test_snapshot_exports_every_field() {
        let raw = RawReply {
            transaction_id: Some("123".to_string()),
            result_date_time: Some("2014-10-18T12:30:45".to_string()),
            processing_db: Some("DB1".to_string()),
            merchant_number: Some("1234567".to_string()),
            tid: Some("T001".to_string()),
            scheme_name: Some("2".to_string()),
            message_number: Some("0".to_string()),
            auth_code: Some("789DE".to_string()),
            auth_message: Some("AUTH CODE:789DE".to_string()),
            pc_avs_result: Some("2".to_string()),
            ad1_avs_result: Some("4".to_string()),
            cvc_result: Some("2".to_string()),
            authorising_entity: Some("1".to_string()),
            ..reply("Authorised")
        };
        let snapshot = TransactionResponse::new(raw).unwrap().snapshot();

        assert_eq!(snapshot.transaction_id, 123);
        assert_eq!(snapshot.scheme_name, "Visa");
        assert_eq!(snapshot.txn_result, "AUTHORISED");
        assert_eq!(snapshot.pc_avs_result, 2);
        assert_eq!(snapshot.ad1_avs_result, 4);
        assert_eq!(snapshot.authorising_entity, 1);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["transactionId"], 123);
        assert_eq!(json["resultDateTimeString"], "2014-10-18T12:30:45");
        assert_eq!(json["processingDb"], "DB1");
        assert_eq!(json["ad1AvsResult"], 4);
        assert_eq!(json["iadOad"], "");
        assert_eq!(json.as_object().unwrap().len(), 20);
    }

    #[test]
    fn test_raw_reply_deserializes_with_missing_fields() {
        let raw: RawReply =
            serde_json::from_str(r#"{"txnresult": "APPROVED", "transactionid": "9"}"#).unwrap();
        let response = TransactionResponse::try_from(raw).unwrap();
        assert!(response.is_approved());
        assert_eq!(response.transaction_id(), 9);
        assert_eq!(response.cvc_result(), 0);
    }
}
