//! URL entry model and validation.
//!
//! Inputs are normalized once, when the entry is built: dates become
//! `YYYY-MM-DD` strings, priorities become a parsed `f64`. A `UrlEntry` that
//! exists is always valid.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use thiserror::Error;

/// Maximum length of a `<loc>` value, in characters.
pub const MAX_LOCATION_LENGTH: usize = 2048;

/// URL entry validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Location is empty.
    #[error("location cannot be empty")]
    EmptyLocation,

    /// Location is longer than the protocol allows.
    #[error("location exceeds 2048 characters (got {length})")]
    LocationTooLong { length: usize },

    /// Change frequency is not one of the protocol tokens.
    #[error("invalid change frequency: {0:?}")]
    InvalidChangeFreq(String),

    /// Priority could not be read as a number.
    #[error("priority is not a number: {0:?}")]
    InvalidPriority(String),

    /// Priority lies outside `0.0..=1.0`.
    #[error("priority {0} is outside 0.0..=1.0")]
    PriorityOutOfRange(f64),
}

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    /// Protocol token for this frequency.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl FromStr for ChangeFreq {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            other => Err(ValidationError::InvalidChangeFreq(other.to_string())),
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last modification value: a date/time or a preformatted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastModified(String);

impl LastModified {
    /// The canonical string emitted in `<lastmod>`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for LastModified
where
    Tz::Offset: fmt::Display,
{
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDateTime> for LastModified {
    fn from(value: NaiveDateTime) -> Self {
        Self(value.format("%Y-%m-%d").to_string())
    }
}

impl From<NaiveDate> for LastModified {
    fn from(value: NaiveDate) -> Self {
        Self(value.format("%Y-%m-%d").to_string())
    }
}

impl From<String> for LastModified {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for LastModified {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Priority input: a number or a numeric string.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorityValue {
    Number(f64),
    Text(String),
}

impl PriorityValue {
    /// Parse and range-check the priority.
    pub fn resolve(&self) -> Result<f64, ValidationError> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| ValidationError::InvalidPriority(s.clone()))?,
        };

        if !value.is_finite() {
            return Err(ValidationError::InvalidPriority(value.to_string()));
        }

        if !(0.0..=1.0).contains(&value) {
            return Err(ValidationError::PriorityOutOfRange(value));
        }

        // -0.0 renders as "-0.0"
        Ok(if value == 0.0 { 0.0 } else { value })
    }
}

impl From<f64> for PriorityValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for PriorityValue {
    // Widening 0.9f32 yields 0.899999976..., so go through its shortest decimal form.
    fn from(value: f32) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i32> for PriorityValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for PriorityValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<String> for PriorityValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for PriorityValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A validated sitemap URL entry.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
    changefreq: Option<ChangeFreq>,
    priority: Option<f64>,
}

impl UrlEntry {
    /// Build an entry, validating every supplied field.
    ///
    /// An empty preformatted `lastmod` is treated as absent.
    pub fn new(
        loc: impl Into<String>,
        lastmod: Option<LastModified>,
        changefreq: Option<&str>,
        priority: Option<PriorityValue>,
    ) -> Result<Self, ValidationError> {
        let loc = loc.into();
        if loc.is_empty() {
            return Err(ValidationError::EmptyLocation);
        }

        let length = loc.chars().count();
        if length > MAX_LOCATION_LENGTH {
            return Err(ValidationError::LocationTooLong { length });
        }

        let changefreq = changefreq.map(str::parse::<ChangeFreq>).transpose()?;
        let priority = priority.as_ref().map(PriorityValue::resolve).transpose()?;
        let lastmod = lastmod.map(|l| l.0).filter(|l| !l.is_empty());

        Ok(Self {
            loc,
            lastmod,
            changefreq,
            priority,
        })
    }

    /// URL location.
    #[must_use]
    pub fn loc(&self) -> &str {
        &self.loc
    }

    /// Last modification, as emitted.
    #[must_use]
    pub fn lastmod(&self) -> Option<&str> {
        self.lastmod.as_deref()
    }

    /// Change frequency.
    #[must_use]
    pub fn changefreq(&self) -> Option<ChangeFreq> {
        self.changefreq
    }

    /// Priority in `0.0..=1.0`.
    #[must_use]
    pub fn priority(&self) -> Option<f64> {
        self.priority
    }
}

/// Render a priority with at least one fractional digit (`1.0`, `0.75`).
#[must_use]
pub fn format_priority(priority: f64) -> String {
    if priority.fract() == 0.0 {
        format!("{priority:.1}")
    } else {
        format!("{priority}")
    }
}
