/// Sender written when the store reports no address for a record.
pub const MISSING_SENDER: &str = "Not Found";

/// Body written when the store reports no text for a record.
pub const MISSING_BODY: &str = "NA";

/// A record exactly as the message store reports it.
///
/// Each field is independently optional so that absence of one column is
/// never confused with absence of the whole record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMessage {
    pub address: Option<String>,
    pub body: Option<String>,
    pub date: Option<i64>,
}

impl RawMessage {
    pub fn new(address: Option<String>, body: Option<String>, date: Option<i64>) -> Self {
        Self {
            address,
            body,
            date,
        }
    }

    /// True when at least one field will be replaced by a default.
    pub fn has_missing_fields(&self) -> bool {
        self.address.is_none() || self.body.is_none() || self.date.is_none()
    }
}

/// One inbox message, normalized. All fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageEntry {
    sender: String,
    body: String,
    received_at_epoch_millis: i64,
}

impl MessageEntry {
    pub fn new(
        sender: impl Into<String>,
        body: impl Into<String>,
        received_at_epoch_millis: i64,
    ) -> Self {
        Self {
            sender: sender.into(),
            body: body.into(),
            received_at_epoch_millis,
        }
    }

    /// Builds an entry from a raw record, substituting the sentinel defaults
    /// for absent text fields and `now()` for an absent timestamp.
    ///
    /// `now` is only called when the record has no date.
    pub fn from_raw(raw: RawMessage, now: impl FnOnce() -> i64) -> Self {
        Self {
            sender: raw.address.unwrap_or_else(|| MISSING_SENDER.to_string()),
            body: raw.body.unwrap_or_else(|| MISSING_BODY.to_string()),
            received_at_epoch_millis: raw.date.unwrap_or_else(now),
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn received_at_epoch_millis(&self) -> i64 {
        self.received_at_epoch_millis
    }
}
