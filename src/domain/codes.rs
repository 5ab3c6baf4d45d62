//! Gateway result code tables.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Card scheme ids as reported in the `schemename` reply field.
static SCHEME_DESCRIPTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("1", "Amex"),
        ("2", "Visa"),
        ("3", "MasterCard/MasterCard One"),
        ("4", "Maestro"),
        ("5", "Diners"),
        ("6", "Visa Debit"),
        ("7", "JCB"),
        ("8", "BT Test Host"),
        ("9", "Time / TradeUK Account card"),
        ("10", "Solo (ceased)"),
        ("11", "Electron"),
        ("21", "Visa CPC"),
        ("23", "AllStar CPC"),
        ("24", "EDC/Maestro (INT) / Laser"),
        ("26", "LTF"),
        ("27", "CAF (Charity Aids Foundation)"),
        ("28", "Creation"),
        ("29", "Clydesdale"),
        ("31", "BHS Gold"),
        ("32", "Mothercare Card"),
        ("33", "Arcadia Group card"),
        ("35", "BA AirPlus"),
        ("36", "Amex CPC"),
        ("41", "FCUK card (Style)"),
        ("48", "Premier Inn Business Account card"),
        ("49", "MasterCard Debit"),
        ("51", "IKEA Home card (IKANO)"),
        ("53", "HFC Store card"),
        ("999", "Invalid Card Range"),
    ])
});

/// Looks up the description of a scheme code.
///
/// The match is exact; codes missing from the table come back verbatim.
pub fn scheme_description(code: &str) -> &str {
    SCHEME_DESCRIPTIONS.get(code).copied().unwrap_or(code)
}

/// Outcome reported in the `txnresult` reply field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TxnResult {
    Error,
    Referral,
    Declined,
    Rejected,
    Charged,
    Approved,
    Authorised,
    AuthOnly,
    CommsDown,
    /// Anything else the provider sends, upper-cased.
    Unknown(String),
}

impl TxnResult {
    /// Parses a raw result, ignoring case.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.to_uppercase();
        match normalized.as_str() {
            "ERROR" => Self::Error,
            "REFERRAL" => Self::Referral,
            "DECLINED" => Self::Declined,
            "REJECTED" => Self::Rejected,
            "CHARGED" => Self::Charged,
            "APPROVED" => Self::Approved,
            "AUTHORISED" => Self::Authorised,
            "AUTHONLY" => Self::AuthOnly,
            "COMMSDOWN" => Self::CommsDown,
            _ => Self::Unknown(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Error => "ERROR",
            Self::Referral => "REFERRAL",
            Self::Declined => "DECLINED",
            Self::Rejected => "REJECTED",
            Self::Charged => "CHARGED",
            Self::Approved => "APPROVED",
            Self::Authorised => "AUTHORISED",
            Self::AuthOnly => "AUTHONLY",
            Self::CommsDown => "COMMSDOWN",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for TxnResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the card security code check (`cvcresult`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CvcResult {
    NotProvided,
    NotChecked,
    Matched,
    NotMatched,
    Other(i64),
}

impl CvcResult {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::NotProvided => "Not provided",
            Self::NotChecked => "Not checked",
            Self::Matched => "Matched",
            Self::NotMatched => "Not matched",
            Self::Other(_) => "Unknown",
        }
    }
}

impl From<i64> for CvcResult {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::NotProvided,
            1 => Self::NotChecked,
            2 => Self::Matched,
            4 => Self::NotMatched,
            other => Self::Other(other),
        }
    }
}
