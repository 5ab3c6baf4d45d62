use crate::domain::response::ResponseSnapshot;
use crate::error::Result;
use std::io::Write;

/// Writes response snapshots as CSV, one row per response, with a header
/// row taken from the snapshot field names.
pub struct SnapshotWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_snapshot(&mut self, snapshot: &ResponseSnapshot) -> Result<()> {
        self.writer.serialize(snapshot)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::response::{RawReply, TransactionResponse};

    #[test]
    fn test_writes_header_and_rows() {
        let response = TransactionResponse::new(RawReply {
            transaction_id: Some("123".to_string()),
            txn_result: Some("charged".to_string()),
            scheme_name: Some("1".to_string()),
            ..Default::default()
        })
        .unwrap();

        let mut buffer = Vec::new();
        {
            let mut writer = SnapshotWriter::new(&mut buffer);
            writer.write_snapshot(&response.snapshot()).unwrap();
            writer.write_snapshot(&response.snapshot()).unwrap();
            writer.flush().unwrap();
        }
        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("transactionId,resultDateTimeString,processingDb,"));
        assert!(lines[0].ends_with(",authorisingEntity"));
        assert!(lines[1].starts_with("123,,,,,,Amex,,,,,CHARGED,0,0,0,"));
    }
}
