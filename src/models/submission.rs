use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::Status;

/// A form entry as returned by the forms API. Fields this service does not
/// look at are kept in `extra` and handed back to the client untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: String,
    /// Kept as raw JSON so an odd value never fails the whole page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Numeric ids become their decimal text; anything else that is not a
/// string becomes empty.
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

impl Submission {
    /// String field of the data payload, if present.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.field("name")
    }

    pub fn email(&self) -> Option<&str> {
        self.field("email")
    }

    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }

    /// `created_at` when the API sent it as text.
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_ref().and_then(Value::as_str)
    }

    /// Creation time in epoch millis. Missing or unparseable timestamps count as 0.
    pub fn created_millis(&self) -> i64 {
        self.created_at()
            .and_then(parse_timestamp)
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0)
    }
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339, a date-time without an
/// offset, or a bare date; the last two are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Submission joined with its current status. Computed per list request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedItem {
    #[serde(flatten)]
    pub submission: Submission,
    #[serde(rename = "_status")]
    pub status: Status,
}

impl MergedItem {
    pub fn new(submission: Submission, status: Status) -> Self {
        Self { submission, status }
    }

    pub fn id(&self) -> &str {
        &self.submission.id
    }
}
