//! Content rows and prompt pairs.
//!
//! A [`ContentRow`] is one keyword's generation slot. Its status, output
//! and error fields are private so the two lifecycle invariants hold by
//! construction:
//! - a `completed` row always has non-empty output,
//! - an `error` row always carries a message.

use chrono::{DateTime, Utc};
use copymill_backend::ContentKind;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique, sortable identifier for a [`ContentRow`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RowId(Ulid);

impl RowId {
    /// Fresh identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for RowId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Lifecycle state of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// Created, not yet generated.
    Pending,
    /// A generation call is in flight.
    Running,
    /// Generation produced output.
    Completed,
    /// Generation failed.
    Error,
}

impl RowStatus {
    /// Wire name of the status.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Invalid row state transitions.
#[derive(Debug, thiserror::Error)]
pub enum RowError {
    /// Completing a row with empty output would break the completed
    /// invariant.
    #[error("completed rows require non-empty output")]
    EmptyOutput,
}

/// One keyword's generation slot.
///
/// Serialized whole into the row store; field names follow the stored
/// contract (`jobTitle`, `createdAt`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRow {
    id: RowId,
    kind: ContentKind,
    keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    job_title: Option<String>,
    status: RowStatus,
    #[serde(default)]
    output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ContentRow {
    /// Pending row for `keyword`.
    #[must_use]
    pub fn new(kind: ContentKind, keyword: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: RowId::new(),
            kind,
            keyword: keyword.into(),
            job_title: None,
            status: RowStatus::Pending,
            output: String::new(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// With a target job title.
    #[must_use]
    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    /// Row identifier.
    #[inline]
    #[must_use]
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Content kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Subject keyword.
    #[inline]
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Target job title, if set.
    #[inline]
    #[must_use]
    pub fn job_title(&self) -> Option<&str> {
        self.job_title.as_deref()
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub fn status(&self) -> RowStatus {
        self.status
    }

    /// Generated HTML output. Non-empty whenever the row is completed.
    #[inline]
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Failure message. Present whenever the row is in error.
    #[inline]
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last state change.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Mark a generation call in flight. Clears any previous error;
    /// previous output stays visible until the new result lands.
    pub fn start(&mut self) {
        self.status = RowStatus::Running;
        self.error = None;
        self.touch();
    }

    /// Record a successful generation. Rejects empty output.
    pub fn complete(&mut self, output: impl Into<String>) -> Result<(), RowError> {
        let output = output.into();
        if output.trim().is_empty() {
            return Err(RowError::EmptyOutput);
        }
        self.status = RowStatus::Completed;
        self.output = output;
        self.error = None;
        self.touch();
        Ok(())
    }

    /// Record a failed generation. An empty message is replaced with a
    /// generic one so error rows always explain themselves.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = RowStatus::Error;
        self.error = Some(if message.trim().is_empty() {
            "generation failed".to_string()
        } else {
            message
        });
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Editable system/user prompt pair for a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptPair {
    /// System prompt.
    pub system: String,
    /// User prompt.
    pub user: String,
}

impl PromptPair {
    /// Pair from the two prompt texts.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}
