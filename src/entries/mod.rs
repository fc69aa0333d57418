// Entry model plus payload validation.
//
// Validation works on raw JSON values rather than letting serde reject the
// body, so malformed payloads surface as 400 responses naming the offending
// field instead of the extractor's generic 422.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use sqlx::FromRow;

use crate::error::ApiError;

pub mod color;

pub const MAX_TEXT_LEN: usize = 1000;
pub const MAX_IV_LEN: usize = 32;
pub const MAX_BADGE_LEN: usize = 50;

/// One persisted daily score + note record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Entry {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub date: String,
    pub score: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Validated create payload. `date` is still optional here; the handler
/// fills in the server-local day before the insert.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub score: i64,
    pub text: String,
    pub date: Option<String>,
    pub iv: Option<String>,
    pub badge: Option<String>,
    pub color: Option<String>,
}

/// Partial update payload: only fields present in the request are set.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub score: Option<i64>,
    pub text: Option<String>,
    pub date: Option<String>,
    pub iv: Option<String>,
    pub badge: Option<String>,
    pub color: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.score.is_none()
            && self.text.is_none()
            && self.date.is_none()
            && self.iv.is_none()
            && self.badge.is_none()
            && self.color.is_none()
    }
}

/// Today's date in the server's local time zone as YYYY-MM-DD.
pub fn local_today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Validate a raw create payload.
pub fn validate_create(payload: &Value) -> Result<NewEntry, ApiError> {
    let body = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("request body must be a JSON object"))?;

    let score = match body.get("score") {
        Some(v) => parse_score(v)?,
        None => return Err(ApiError::validation("score is required")),
    };

    let text = match body.get("text") {
        Some(v) => parse_text(v)?,
        None => String::new(),
    };

    let date = body.get("date").map(parse_date).transpose()?;
    let iv = body.get("iv").map(parse_iv).transpose()?;
    let badge = body.get("badge").map(parse_badge).transpose()?;
    let color = body.get("color").map(parse_color).transpose()?;

    Ok(NewEntry { score, text, date, iv, badge, color })
}

/// Validate a raw update payload. Fails when no updatable field is present.
pub fn validate_update(payload: &Value) -> Result<EntryPatch, ApiError> {
    let body = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("request body must be a JSON object"))?;

    let patch = EntryPatch {
        score: body.get("score").map(parse_score).transpose()?,
        text: body.get("text").map(parse_text).transpose()?,
        date: body.get("date").map(parse_date).transpose()?,
        iv: body.get("iv").map(parse_iv).transpose()?,
        badge: body.get("badge").map(parse_badge).transpose()?,
        color: body.get("color").map(parse_color).transpose()?,
    };

    if patch.is_empty() {
        return Err(ApiError::validation("no fields to update"));
    }

    Ok(patch)
}

/// Validate an optional date-bound query parameter (`from` / `to`).
pub fn validate_date_param(name: &str, value: &str) -> Result<String, ApiError> {
    if is_calendar_date(value) {
        Ok(value.to_string())
    } else {
        Err(ApiError::validation(format!("{} must match YYYY-MM-DD", name)))
    }
}

fn parse_score(v: &Value) -> Result<i64, ApiError> {
    // Whole-valued floats (e.g. 42.0) coerce; anything fractional or
    // non-numeric is rejected.
    let n = match v {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
            }
        }
        _ => None,
    };

    match n {
        Some(score) if (1..=100).contains(&score) => Ok(score),
        _ => Err(ApiError::validation("score must be an integer between 1 and 100")),
    }
}

fn parse_text(v: &Value) -> Result<String, ApiError> {
    let s = v
        .as_str()
        .ok_or_else(|| ApiError::validation("text must be a string"))?;
    if s.chars().count() > MAX_TEXT_LEN {
        return Err(ApiError::validation(format!(
            "text must be at most {} characters",
            MAX_TEXT_LEN
        )));
    }
    Ok(s.to_string())
}

fn parse_date(v: &Value) -> Result<String, ApiError> {
    let s = v
        .as_str()
        .ok_or_else(|| ApiError::validation("date must be a string"))?;
    if !is_calendar_date(s) {
        return Err(ApiError::validation("date must match YYYY-MM-DD"));
    }
    Ok(s.to_string())
}

fn parse_iv(v: &Value) -> Result<String, ApiError> {
    let s = v
        .as_str()
        .ok_or_else(|| ApiError::validation("iv must be a string"))?;
    if s.chars().count() > MAX_IV_LEN {
        return Err(ApiError::validation(format!(
            "iv must be at most {} characters",
            MAX_IV_LEN
        )));
    }
    Ok(s.to_string())
}

fn parse_badge(v: &Value) -> Result<String, ApiError> {
    let s = v
        .as_str()
        .ok_or_else(|| ApiError::validation("badge must be a string"))?;
    if s.chars().count() > MAX_BADGE_LEN {
        return Err(ApiError::validation(format!(
            "badge must be at most {} characters",
            MAX_BADGE_LEN
        )));
    }
    Ok(s.to_string())
}

fn parse_color(v: &Value) -> Result<String, ApiError> {
    v.as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| ApiError::validation("color must be a string"))
}

/// Strict YYYY-MM-DD: fixed width and a real calendar date.
fn is_calendar_date(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
