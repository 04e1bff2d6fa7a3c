use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::BookId;

/// Where a book sits on the trainer's reading list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    #[default]
    NotStarted,
    InProgress,
    Read,
}

impl ReadingStatus {
    /// Read a backend status value; anything unrecognised is treated as not started.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim() {
            "in_progress" => Self::InProgress,
            "read" => Self::Read,
            _ => Self::NotStarted,
        }
    }

    #[must_use]
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Read => "read",
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Read => "Read",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown reading status: {raw:?} (expected not_started, in_progress or read)")]
pub struct ParseStatusError {
    pub raw: String,
}

/// Strict counterpart of [`ReadingStatus::from_wire`] for user input.
impl FromStr for ReadingStatus {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "read" => Ok(Self::Read),
            _ => Err(ParseStatusError {
                raw: raw.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: Option<String>,
    pub status: ReadingStatus,
    pub description: Option<String>,
}

impl Book {
    #[must_use]
    pub fn new(id: BookId, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            category: None,
            status: ReadingStatus::NotStarted,
            description: None,
        }
    }

    #[must_use]
    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: ReadingStatus) -> Self {
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_wire_status_is_not_started() {
        assert_eq!(ReadingStatus::from_wire("read"), ReadingStatus::Read);
        assert_eq!(ReadingStatus::from_wire("in_progress"), ReadingStatus::InProgress);
        assert_eq!(ReadingStatus::from_wire("shelved"), ReadingStatus::NotStarted);
    }

    #[test]
    fn parsing_user_input_is_strict() {
        assert_eq!("in_progress".parse::<ReadingStatus>(), Ok(ReadingStatus::InProgress));
        assert_eq!(" read ".parse::<ReadingStatus>(), Ok(ReadingStatus::Read));
        assert!("shelved".parse::<ReadingStatus>().is_err());
    }
}
