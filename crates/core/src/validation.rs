//! Input validation for submitted items and partial updates.
//!
//! Validation is a pure function of the payload and the current instant;
//! callers pass `now` so the seven-day rule is deterministic under test.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use thiserror::Error;

use crate::item::{ItemChanges, NewItem};

/// Names and user names must be strictly shorter than this (in characters).
pub const MAX_NAME_LEN: usize = 50;

/// How far in the future a start date must be, at minimum.
pub fn minimum_lead_time() -> Duration {
    Duration::weeks(1)
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Name must be less than 50 characters")]
    NameTooLong,

    #[error("{0}")]
    InvalidUsers(String),

    #[error("{0}")]
    InvalidDate(String),

    #[error("No updatable fields provided")]
    EmptyUpdate,
}

/// A candidate item as submitted by a client; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDraft {
    pub name: Option<String>,
    pub postcode: Option<String>,
    pub start_date: Option<String>,
    pub users: Option<Vec<String>>,
    pub title: Option<String>,
}

impl ItemDraft {
    /// Check required fields, then name, users and start date, in that order.
    pub fn validate(self, now: DateTime<Utc>) -> Result<NewItem, ValidationError> {
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        let postcode = self.postcode.ok_or(ValidationError::MissingField("postcode"))?;
        let start_date = self.start_date.ok_or(ValidationError::MissingField("startDate"))?;
        let users = self.users.ok_or(ValidationError::MissingField("users"))?;

        validate_name(&name)?;
        validate_users(&users)?;
        let start_date = validate_start_date(&start_date, now)?;

        Ok(NewItem {
            name,
            postcode,
            users,
            start_date,
            title: self.title,
        })
    }
}

/// A candidate partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub postcode: Option<String>,
    pub start_date: Option<String>,
    pub users: Option<Vec<String>>,
    pub title: Option<String>,
}

impl ItemPatch {
    /// Apply the create-time rules to whichever fields are present.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ItemChanges, ValidationError> {
        if self == ItemPatch::default() {
            return Err(ValidationError::EmptyUpdate);
        }

        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(users) = &self.users {
            validate_users(users)?;
        }
        let start_date = self
            .start_date
            .as_deref()
            .map(|raw| validate_start_date(raw, now))
            .transpose()?;

        Ok(ItemChanges {
            name: self.name,
            postcode: self.postcode,
            users: self.users,
            start_date,
            title: self.title,
            geo: None,
        })
    }
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() >= MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

pub fn validate_users(users: &[String]) -> Result<(), ValidationError> {
    if users.is_empty() {
        return Err(ValidationError::InvalidUsers(
            "Users list cannot be empty".to_string(),
        ));
    }
    if let Some(user) = users.iter().find(|u| u.chars().count() >= MAX_NAME_LEN) {
        return Err(ValidationError::InvalidUsers(format!(
            "User name '{user}' exceeds {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Parse `raw` and require it to be at least [`minimum_lead_time`] after `now`.
///
/// The boundary is inclusive: exactly `now + 7 days` is accepted.
pub fn validate_start_date(
    raw: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<FixedOffset>, ValidationError> {
    let start = parse_start_date(raw)
        .ok_or_else(|| ValidationError::InvalidDate("Invalid date format".to_string()))?;

    if start.with_timezone(&Utc) < now + minimum_lead_time() {
        return Err(ValidationError::InvalidDate(
            "Start date must be at least 1 week from now".to_string(),
        ));
    }
    Ok(start)
}

/// Accepts RFC 3339, naive ISO date-times (taken as UTC) and plain dates.
pub fn parse_start_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}
