//! Error types for sighting event processing

use std::fmt;

use thiserror::Error;

/// Result type for the fatal stages of event processing
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal errors. Either one aborts processing of the event and no report is produced.
#[derive(Error, Debug)]
pub enum Error {
    /// The event payload is missing fields or carries malformed values
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The sighting report token could not be decoded
    #[error("Invalid report token: {0}")]
    TokenDecode(#[from] TokenDecodeError),
}

/// What went wrong with a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    TypeMismatch,
    MalformedUrl,
    MalformedUuid,
    MalformedTimestamp,
    Invalid,
    Unparseable,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IssueKind::Missing => "required field missing",
            IssueKind::TypeMismatch => "type mismatch",
            IssueKind::MalformedUrl => "malformed URL",
            IssueKind::MalformedUuid => "malformed UUID",
            IssueKind::MalformedTimestamp => "malformed timestamp",
            IssueKind::Invalid => "invalid value",
            IssueKind::Unparseable => "not parseable as JSON or YAML",
        };
        f.write_str(text)
    }
}

/// One offending field, addressed by its path in the raw payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub path: String,
    pub kind: IssueKind,
    pub detail: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<event>" } else { &self.path };
        if self.detail.is_empty() {
            write!(f, "{}: {}", path, self.kind)
        } else {
            write!(f, "{}: {} ({})", path, self.kind, self.detail)
        }
    }
}

/// Every field issue found while parsing an event payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// Returns true if any issue was reported at exactly `path`
    pub fn has_issue_at(&self, path: &str) -> bool {
        self.issues.iter().any(|issue| issue.path == path)
    }

    pub fn kind_at(&self, path: &str) -> Option<IssueKind> {
        self.issues
            .iter()
            .find(|issue| issue.path == path)
            .map(|issue| issue.kind)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s) in sighting event", self.issues.len())?;
        for issue in &self.issues {
            write!(f, "\n  {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Failures extracting the embedded payload of a signed report token.
///
/// The signature segment is never verified, so none of these relate to authenticity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenDecodeError {
    #[error("token is empty")]
    Empty,

    #[error("expected 3 dot-separated segments, found {0}")]
    Malformed(usize),

    #[error("{0} segment is not valid base64url")]
    Base64(&'static str),

    #[error("{0} segment is not a JSON object")]
    Json(&'static str),

    #[error("payload has no reportToken field")]
    MissingReportToken,

    #[error("reportToken field is not a string")]
    ReportTokenNotString,

    #[error("reportToken does not hold valid JSON: {0}")]
    ReportTokenJson(String),
}

/// Failures of the best-effort enrichment lookup. Never fatal.
#[derive(Error, Debug)]
pub enum EnrichmentLookupError {
    #[error("lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup returned HTTP {0}")]
    Status(u16),

    #[error("lookup response could not be decoded: {0}")]
    Decode(String),
}
