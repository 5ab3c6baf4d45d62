#![allow(dead_code)]

use paygate::config::GatewayConfig;
use paygate::domain::ports::TransportReply;
use std::io::{Error, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Nothing listens on the discard port, so connections are refused at once.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1/ws";

pub fn config_json(endpoint_url: &str, invalid_url: Option<&str>) -> String {
    let invalid = invalid_url
        .map(|url| format!(r#", "invalid_url": "{}""#, url))
        .unwrap_or_default();
    format!(
        r#"{{
            "system": {{
                "system_id": "1234",
                "system_guid": "11111111-2222-3333-4444-555555555555",
                "passcode": "secret",
                "endpoint_url": "{}",
                "timeout_secs": 5{}
            }},
            "merchant": {{ "account_id": "98765", "account_passcode": "merchant-secret" }}
        }}"#,
        endpoint_url, invalid
    )
}

pub fn config(endpoint_url: &str) -> GatewayConfig {
    GatewayConfig::from_json_str(&config_json(endpoint_url, None)).unwrap()
}

pub fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn reply(fields: &[(&str, &str)]) -> TransportReply {
    TransportReply {
        reply: fields.iter().copied().collect(),
        debug_info: String::new(),
    }
}

pub fn reply_with_debug(fields: &[(&str, &str)], debug_info: &str) -> TransportReply {
    TransportReply {
        reply: fields.iter().copied().collect(),
        debug_info: debug_info.to_string(),
    }
}

pub fn generate_charges_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["pan", "csc", "expiry", "amount", "reference"])?;

    for i in 1..=rows {
        wtr.write_record([
            "4111111111111111",
            "123",
            "2512",
            "10.00",
            &format!("order-{}", i),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
