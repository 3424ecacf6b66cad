//! Gateway wire types that never leave this crate
//!
//! Responses are read leniently: keys are accepted in PascalCase or
//! camelCase, missing strings become empty, unparseable dates become `None`.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use einvoice_domain::StatusRecord;
use serde::{Deserialize, Deserializer, Serialize};

/// `POST connect/token` response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

/// 2xx body of a create endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct SuccessEnvelope {
    #[serde(default, alias = "Success")]
    pub success: Option<SuccessMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuccessMessage {
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
}

impl SuccessEnvelope {
    /// Confirmation message from a raw success body, if the gateway sent one.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|envelope| envelope.success)
            .and_then(|success| success.message)
            .filter(|message| !message.is_empty())
    }
}

/// `POST api/einvoicestatus` request.
#[derive(Debug, Serialize)]
pub struct StatusRequest<'a> {
    #[serde(rename = "DocType")]
    pub doc_type: &'a str,
    #[serde(rename = "RefNo")]
    pub ref_nos: &'a [String],
}

/// `POST api/einvoicestatus` response.
#[derive(Debug, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default, rename = "Data", alias = "data")]
    pub data: Option<Vec<StatusData>>,
}

#[derive(Debug, Deserialize)]
pub struct StatusData {
    #[serde(default, rename = "DocType", alias = "docType")]
    pub doc_type: String,
    #[serde(default, rename = "RefNo", alias = "refNo")]
    pub ref_no: String,
    #[serde(default, rename = "DocDate", alias = "docDate", deserialize_with = "lenient_naive")]
    pub doc_date: Option<NaiveDateTime>,
    #[serde(default, rename = "EInvIRBMNo", alias = "eInvIRBMNo", deserialize_with = "null_as_empty")]
    pub authority_id: String,
    #[serde(default, rename = "EInvValLink", alias = "eInvValLink", deserialize_with = "null_as_empty")]
    pub validation_link: String,
    #[serde(default, rename = "EInvValDate", alias = "eInvValDate", deserialize_with = "lenient_offset")]
    pub validation_date: Option<DateTime<FixedOffset>>,
    #[serde(default, rename = "Status", alias = "status", deserialize_with = "null_as_empty")]
    pub status: String,
}

impl From<StatusData> for StatusRecord {
    fn from(data: StatusData) -> Self {
        StatusRecord {
            doc_type: data.doc_type,
            ref_no: data.ref_no,
            doc_date: data.doc_date,
            authority_id: data.authority_id,
            validation_date: data.validation_date,
            validation_link: data.validation_link,
            status: data.status,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_naive<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_naive))
}

fn lenient_offset<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|value| {
        DateTime::parse_from_rfc3339(value.trim())
            .ok()
            .or_else(|| parse_naive(value).map(|naive| naive.and_utc().fixed_offset()))
    }))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
