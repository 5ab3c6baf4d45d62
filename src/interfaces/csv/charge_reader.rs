use crate::application::checkout::ChargeRequest;
use crate::error::{PaymentError, Result};
use std::io::Read;

/// Reads card sales from a CSV source.
///
/// Expects the header `pan,csc,expiry,amount,reference`; the reference
/// column may be empty or missing. Whitespace around values is trimmed.
pub struct ChargeReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ChargeReader<R> {
    /// Creates a new `ChargeReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes sales, one
    /// `Result` per row so a bad row does not end the batch.
    pub fn charges(self) -> impl Iterator<Item = Result<ChargeRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PaymentError::from))
    }
}
