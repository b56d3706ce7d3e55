// src/entity/entry.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::validation::{require, validate_body, validate_title, ValidationError};

/// A single journal record.
///
/// `id` and `created_at` are fixed when the entry is built; the only mutation
/// path is [`Entry::apply`], which refreshes `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Identifier assigned by the store
    #[schema(example = "0b5e3c1e-6f2a-4b8e-9a57-3f2d1c0e9b11")]
    id: Uuid,
    /// Entry title
    #[schema(example = "Entry Title", max_length = 50)]
    title: String,
    /// Entry content
    #[schema(example = "This is the body of the entry.", max_length = 5000)]
    body: String,
    /// Creation time
    #[schema(example = "2024-09-09T00:00:00.000Z")]
    created_at: DateTime<Utc>,
    /// Time of the last update
    #[schema(example = "2024-09-09T00:00:00.000Z")]
    updated_at: DateTime<Utc>,
}

/// Client input for creating an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NewEntry {
    #[schema(example = "Day 1")]
    pub title: Option<String>,
    #[schema(example = "Hello")]
    pub body: Option<String>,
}

/// Client input for updating an entry. Absent or empty fields keep their
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EntryPatch {
    #[schema(example = "Day 1")]
    pub title: Option<String>,
    #[schema(example = "Hello world")]
    pub body: Option<String>,
}

impl NewEntry {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Check presence and bounds, returning the validated `(title, body)`.
    pub fn into_fields(self) -> Result<(String, String), ValidationError> {
        let title = require("title", self.title)?;
        let body = require("body", self.body)?;
        validate_title(&title)?;
        validate_body(&body)?;
        Ok((title, body))
    }
}

impl Entry {
    /// Build a validated entry with both timestamps set to now.
    pub fn new(id: Uuid, title: String, body: String) -> Result<Self, ValidationError> {
        let now = super::now();
        let entry = Self {
            id,
            title,
            body,
            created_at: now,
            updated_at: now,
        };
        entry.validate()?;
        Ok(entry)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_body(&self.body)?;
        Ok(())
    }

    /// Apply an update. Fields that are present and non-empty replace the
    /// stored value; `updated_at` is refreshed either way. On error the entry
    /// is left unchanged.
    pub fn apply(&mut self, patch: EntryPatch) -> Result<(), ValidationError> {
        let title = patch.title.filter(|t| !t.is_empty());
        let body = patch.body.filter(|b| !b.is_empty());

        if let Some(title) = &title {
            validate_title(title)?;
        }
        if let Some(body) = &body {
            validate_body(body)?;
        }

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        self.updated_at = super::now().max(self.updated_at);
        Ok(())
    }
}
