use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Resolving,
    Locating,
    Extracting,
    Downloading,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolving => write!(f, "version resolution"),
            Stage::Locating => write!(f, "page location"),
            Stage::Extracting => write!(f, "link extraction"),
            Stage::Downloading => write!(f, "download"),
        }
    }
}

/// Page believed to host the real download button, pending extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePage {
    pub url: String,
    pub matched_keywords: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub final_url: String,
    pub suggested_filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    pub url: String,
    pub bytes_downloaded: u64,
    /// Declared size, 0 when the server sent no length.
    pub bytes_total: u64,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StageStarted { stage: Stage, input: String },
    Transfer(TransferProgress),
    TransferCompleted(TransferProgress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The requested version, page or link does not exist upstream.
    NotFound,
    /// Upstream markup or data no longer has the expected shape.
    StructureMismatch,
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    Network,
    Io,
}

impl FailureKind {
    /// True for failures of the HTTP exchange itself.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FailureKind::InvalidUrl
                | FailureKind::HttpStatus(_)
                | FailureKind::Timeout
                | FailureKind::RedirectLimitExceeded
                | FailureKind::Network
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::StructureMismatch => write!(f, "structure mismatch"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, message)
    }

    pub fn structure(message: impl Into<String>) -> Self {
        Self::new(FailureKind::StructureMismatch, message)
    }

    /// Attaches the stage and input this failure belongs to.
    pub fn at(self, stage: Stage, input: impl Into<String>) -> PipelineError {
        PipelineError {
            stage,
            input: input.into(),
            failure: self,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} failed for {input}: {failure}")]
pub struct PipelineError {
    pub stage: Stage,
    pub input: String,
    #[source]
    pub failure: Failure,
}

impl PipelineError {
    pub fn kind(&self) -> &FailureKind {
        &self.failure.kind
    }
}
