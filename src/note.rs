use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const ID_TS_WIDTH: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Study,
    Work,
    #[default]
    Personal,
    Others,
}

impl Category {
    pub const ALL: [Category; 4] =
        [Category::Study, Category::Work, Category::Personal, Category::Others];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Study => "Study",
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Others => "Others",
        }
    }

    /// Exact, case-insensitive lookup.
    pub fn parse(name: &str) -> Option<Category> {
        let name = name.trim();
        Category::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(name))
    }

    /// Lookup that falls back to `Personal` for unset or unknown names.
    pub fn parse_or_default(name: &str) -> Category {
        Category::parse(name).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::parse_or_default(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// Fields submitted from the create form.
#[derive(Debug, Clone, Default)]
pub struct NoteInput {
    pub title: String,
    pub content: String,
    pub category: Option<Category>,
}

impl NoteInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self { title: title.into(), content: content.into(), category: None }
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}

/// Partial update; `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<Category>,
    pub is_pinned: Option<bool>,
}

pub fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    let len = title.chars().count();
    if len > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleTooLong { len, max: TITLE_MAX_CHARS });
    }
    Ok(title.to_string())
}

pub fn validate_content(raw: &str) -> Result<String, ValidationError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(content.to_string())
}

/// Current time at millisecond precision so snapshots round-trip exactly.
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Hands out time-derived ids that never repeat for the lifetime of the
/// generator, even when several are requested in the same microsecond.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last_ts: i64,
    counter: u32,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// `taken` reports ids already present in the collection.
    pub fn next_id(&mut self, taken: impl Fn(&str) -> bool) -> String {
        loop {
            let now = Utc::now().timestamp_micros();
            let ts = if now <= self.last_ts { self.last_ts } else { now };

            if ts == self.last_ts {
                self.counter = self.counter.saturating_add(1);
            } else {
                self.last_ts = ts;
                self.counter = 0;
            }

            let ts_enc = encode_base62_width(ts.max(0) as u64, ID_TS_WIDTH);
            let id = if self.counter == 0 {
                ts_enc
            } else {
                format!("{ts_enc}{}", encode_base62(self.counter as u64))
            };

            if !taken(&id) {
                return id;
            }
        }
    }
}

fn encode_base62(num: u64) -> String {
    const ALPHABET: &[u8] =
        b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut n = num;
    let base = ALPHABET.len() as u64;
    let mut out = Vec::new();
    while n > 0 {
        out.push(ALPHABET[(n % base) as usize] as char);
        n /= base;
    }
    out.iter().rev().collect()
}

fn encode_base62_width(num: u64, width: usize) -> String {
    let enc = encode_base62(num);
    if enc.len() >= width {
        enc
    } else {
        format!("{}{}", "0".repeat(width - enc.len()), enc)
    }
}
