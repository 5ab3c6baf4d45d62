use crate::config::GatewayConfig;
use crate::domain::ports::{Transport, TransportReply};
use crate::domain::request::{RequestBody, TransactionRequest};
use crate::domain::response::RawReply;
use crate::error::{PaymentError, Result, TransportError};
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

/// Namespace of the `ProcessMsg` operation.
pub const SERVICE_NAMESPACE: &str = "https://www.commidea.webservices.com";
const SOAP_ACTION: &str = "https://www.commidea.webservices.com/ProcessMsg";

// Fixed values for a UK card-not-present sale.
const TXN_TYPE_PURCHASE: &str = "01";
const CURRENCY_GBP: &str = "826";
const COUNTRY_GB: &str = "826";
const TERMINAL_CAPABILITIES: &str = "4298";
const CAPTURE_METHOD_CNP: &str = "12";
const PROCESSING_ID_AUTH_AND_CHARGE: &str = "1";

// ============================================================================
// Wire structures (serialized with quick-xml)
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename = "Message")]
struct MessageXml<'a> {
    #[serde(rename = "ClientHeader")]
    client_header: ClientHeaderXml<'a>,
    #[serde(rename = "MsgType")]
    msg_type: &'static str,
    /// Inner document, escaped as text.
    #[serde(rename = "MsgData")]
    msg_data: String,
}

#[derive(Debug, Serialize)]
struct ClientHeaderXml<'a> {
    #[serde(rename = "SystemID")]
    system_id: &'a str,
    #[serde(rename = "SystemGUID")]
    system_guid: &'a str,
    #[serde(rename = "Passcode")]
    passcode: &'a str,
    #[serde(rename = "ProcessingDB")]
    processing_db: &'a str,
    #[serde(rename = "SendAttempt")]
    send_attempt: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename = "transactionrequest")]
struct TransactionRequestXml<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    merchantreference: &'a str,
    accountid: &'a str,
    accountpasscode: &'a str,
    txntype: &'static str,
    transactioncurrencycode: &'static str,
    terminalcountrycode: &'static str,
    apacsterminalcapabilities: &'static str,
    capturemethod: &'static str,
    processingidentifier: &'static str,
    pan: &'a str,
    csc: &'a str,
    expirydate: &'a str,
    txnvalue: String,
}

#[derive(Debug, Serialize)]
#[serde(rename = "confirmationrequest")]
struct ConfirmationRequestXml {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    transactionid: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename = "rejectionrequest")]
struct RejectionRequestXml<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    transactionid: i64,
    pan: &'a str,
}

/// Stands in for credentials and security codes in diagnostic text.
pub const REDACTED: &str = "[redacted]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Secrets {
    Include,
    Redact,
}

impl Secrets {
    fn show(self, value: &str) -> &str {
        match self {
            Self::Include => value,
            Self::Redact => REDACTED,
        }
    }
}

fn encode_err(err: impl std::fmt::Display) -> TransportError {
    TransportError::Encode(err.to_string())
}

fn malformed(err: impl std::fmt::Display) -> TransportError {
    TransportError::MalformedReply(err.to_string())
}

/// Builds the inner `MsgData` document for a request.
pub fn encode_msg_data(request: &TransactionRequest) -> std::result::Result<String, TransportError> {
    msg_data(request, Secrets::Include)
}

fn msg_data(
    request: &TransactionRequest,
    secrets: Secrets,
) -> std::result::Result<String, TransportError> {
    let msg_type = request.message_type().as_str();
    match request.message() {
        RequestBody::Authorization(body) => quick_xml::se::to_string(&TransactionRequestXml {
            xmlns: msg_type,
            merchantreference: body.merchant_reference(),
            accountid: body.account_id(),
            accountpasscode: secrets.show(body.account_passcode()),
            txntype: TXN_TYPE_PURCHASE,
            transactioncurrencycode: CURRENCY_GBP,
            terminalcountrycode: COUNTRY_GB,
            apacsterminalcapabilities: TERMINAL_CAPABILITIES,
            capturemethod: CAPTURE_METHOD_CNP,
            processingidentifier: PROCESSING_ID_AUTH_AND_CHARGE,
            pan: body.pan().expose(),
            csc: secrets.show(body.csc()),
            expirydate: body.expiry_date(),
            txnvalue: body.amount().to_wire(),
        }),
        RequestBody::Confirmation(body) => quick_xml::se::to_string(&ConfirmationRequestXml {
            xmlns: msg_type,
            transactionid: body.transaction_id(),
        }),
        RequestBody::Rejection(body) => quick_xml::se::to_string(&RejectionRequestXml {
            xmlns: msg_type,
            transactionid: body.transaction_id(),
            pan: body.pan().expose(),
        }),
    }
    .map_err(encode_err)
}

/// Builds the full SOAP envelope for a request.
pub fn encode_envelope(request: &TransactionRequest) -> std::result::Result<String, TransportError> {
    envelope(request, Secrets::Include)
}

/// The envelope as it may appear in diagnostics: system GUID, passcodes and
/// the card security code are replaced by [`REDACTED`]. The PAN is left for
/// the caller's masking.
pub fn encode_redacted_envelope(
    request: &TransactionRequest,
) -> std::result::Result<String, TransportError> {
    envelope(request, Secrets::Redact)
}

fn envelope(
    request: &TransactionRequest,
    secrets: Secrets,
) -> std::result::Result<String, TransportError> {
    let system = request.system();
    let message = MessageXml {
        client_header: ClientHeaderXml {
            system_id: &system.system_id,
            system_guid: secrets.show(&system.system_guid),
            passcode: secrets.show(&system.passcode),
            processing_db: request.processing_db(),
            send_attempt: 0,
        },
        msg_type: request.message_type().as_str(),
        msg_data: msg_data(request, secrets)?,
    };
    let message_xml = quick_xml::se::to_string(&message).map_err(encode_err)?;

    Ok(format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
<soap:Body>
<ProcessMsg xmlns="{SERVICE_NAMESPACE}">{message_xml}</ProcessMsg>
</soap:Body>
</soap:Envelope>"#
    ))
}

/// Collects `(element, text)` for every leaf element, element names
/// lowercased and stripped of namespace prefixes.
fn leaf_elements(xml: &str) -> std::result::Result<Vec<(String, String)>, TransportError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut leaves = Vec::new();
    let mut open: Option<(String, String)> = None;
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(start) => {
                let name = String::from_utf8_lossy(start.local_name().as_ref()).to_ascii_lowercase();
                open = Some((name, String::new()));
            }
            Event::Empty(empty) => {
                let name = String::from_utf8_lossy(empty.local_name().as_ref()).to_ascii_lowercase();
                leaves.push((name, String::new()));
            }
            Event::Text(text) => {
                if let Some((_, value)) = open.as_mut() {
                    value.push_str(&text.unescape().map_err(malformed)?);
                }
            }
            Event::CData(data) => {
                if let Some((_, value)) = open.as_mut() {
                    value.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                if let Some(leaf) = open.take() {
                    leaves.push(leaf);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(leaves)
}

/// Reads a `ProcessMsg` reply envelope into reply fields.
pub fn decode_envelope(body: &str) -> std::result::Result<RawReply, TransportError> {
    let envelope = leaf_elements(body)?;
    let find = |name: &str| {
        envelope
            .iter()
            .find(|(element, _)| element == name)
            .map(|(_, value)| value.as_str())
    };

    if let Some(message) = find("faultstring") {
        return Err(TransportError::Fault {
            code: find("faultcode").unwrap_or_default().to_string(),
            message: message.to_string(),
        });
    }

    let msg_data = find("msgdata")
        .ok_or_else(|| malformed("reply has no MsgData element"))?;
    Ok(leaf_elements(msg_data)?.into_iter().collect())
}

/// Talks to the gateway's SOAP endpoint over HTTPS.
pub struct SoapTransport {
    client: reqwest::Client,
    url: String,
    invalid_url: Option<String>,
    timeout_secs: u64,
}

impl SoapTransport {
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.system.timeout())
            .build()
            .map_err(|e| PaymentError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.system.endpoint_url.clone(),
            invalid_url: config.system.invalid_url.clone(),
            timeout_secs: config.system.timeout_secs,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Points the transport at the configured invalid URL, to exercise
    /// transport failures against a real client.
    pub fn use_invalid_url(mut self) -> Result<Self> {
        let invalid = self.invalid_url.clone().ok_or_else(|| {
            PaymentError::Config("system.invalid_url is not configured".to_string())
        })?;
        self.url = invalid;
        Ok(self)
    }

    fn classify(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: self.url.clone(),
                seconds: self.timeout_secs,
            }
        } else {
            TransportError::Unreachable {
                url: self.url.clone(),
                reason: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transport for SoapTransport {
    async fn process_msg(
        &self,
        request: &TransactionRequest,
    ) -> std::result::Result<TransportReply, TransportError> {
        let envelope = encode_envelope(request)?;

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(envelope)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.classify(e))?;
        tracing::debug!(status = status.as_u16(), url = %self.url, "Gateway replied");

        // SOAP faults arrive as HTTP 500, so read the body before the status.
        let reply = match decode_envelope(&body) {
            Ok(reply) => reply,
            Err(TransportError::MalformedReply(_)) if !status.is_success() => {
                return Err(TransportError::Http {
                    status: status.as_u16(),
                });
            }
            Err(err) => return Err(err),
        };

        Ok(TransportReply {
            reply,
            debug_info: debug_text(request, &body)?,
        })
    }
}

/// Request and reply as logged: the request is re-encoded with secrets
/// redacted.
fn debug_text(request: &TransactionRequest, body: &str) -> std::result::Result<String, TransportError> {
    let envelope = encode_redacted_envelope(request)?;
    Ok(format!("Request:\n{envelope}\nResponse:\n{body}"))
}
