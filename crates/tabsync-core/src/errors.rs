use tabsync_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using TsError
pub type Result<T> = std::result::Result<T, TsError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// A stable, structured classification of all errors in the TabSync system.
/// Each kind maps to a stable error code usable for programmatic handling,
/// testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsErrorKind {
    // Reconciliation
    /// The diff references columns the physical snapshot table does not have
    SchemaMismatch,
    /// A single row failed to apply inside an otherwise-successful batch
    RowApplication,
    /// The whole apply/seed transaction failed to commit
    Transaction,
    /// A reconciliation pass is already running for this source key
    LockContention,
    /// The external source fetch failed before any diff/apply step
    SourceFetch,

    // Structural/Validation
    InvalidInput,
    NotFound,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Timeout,

    // Internal
    Internal,
}

impl TsErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            TsErrorKind::SchemaMismatch => "ERR_SCHEMA_MISMATCH",
            TsErrorKind::RowApplication => "ERR_ROW_APPLICATION",
            TsErrorKind::Transaction => "ERR_TRANSACTION",
            TsErrorKind::LockContention => "ERR_LOCK_CONTENTION",
            TsErrorKind::SourceFetch => "ERR_SOURCE_FETCH",
            TsErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            TsErrorKind::NotFound => "ERR_NOT_FOUND",
            TsErrorKind::Io => "ERR_IO",
            TsErrorKind::Serialization => "ERR_SERIALIZATION",
            TsErrorKind::Persistence => "ERR_PERSISTENCE",
            TsErrorKind::Timeout => "ERR_TIMEOUT",
            TsErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a caller may reasonably retry the failed operation as-is.
    ///
    /// Lock contention clears when the in-flight pass finishes; fetch and
    /// timeout failures are transient. Schema mismatches need provisioning
    /// first and are not retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TsErrorKind::LockContention | TsErrorKind::SourceFetch | TsErrorKind::Timeout
        )
    }
}

/// Canonical structured error type
///
/// Carries a kind plus classification fields for programmatic handling and
/// rich context for debugging.
#[derive(Debug, Clone)]
pub struct TsError {
    kind: TsErrorKind,
    op: Option<String>,
    source_key: Option<String>,
    entry_id: Option<i64>,
    position: Option<usize>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl TsError {
    /// Create a new error with the specified kind
    pub fn new(kind: TsErrorKind) -> Self {
        Self {
            kind,
            op: None,
            source_key: None,
            entry_id: None,
            position: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add source key context
    pub fn with_source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = Some(key.into());
        self
    }

    /// Add snapshot entry ID context
    pub fn with_entry_id(mut self, id: i64) -> Self {
        self.entry_id = Some(id);
        self
    }

    /// Add row position context
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> TsErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the source key context, if any
    pub fn source_key(&self) -> Option<&str> {
        self.source_key.as_deref()
    }

    /// Get the snapshot entry ID context, if any
    pub fn entry_id(&self) -> Option<i64> {
        self.entry_id
    }

    /// Get the row position context, if any
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for TsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(key) = &self.source_key {
            write!(f, " (source_key: {})", key)?;
        }
        if let Some(id) = self.entry_id {
            write!(f, " (entry_id: {})", id)?;
        }
        if let Some(position) = self.position {
            write!(f, " (position: {})", position)?;
        }
        Ok(())
    }
}

impl std::error::Error for TsError {}

// ========== End Error Facility ==========

/// Boundary error for `RowSource` implementors.
///
/// Fetch collaborators live outside this workspace; this enum gives them a
/// conventional error surface that converts into the canonical facility.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The source backend was unreachable or returned a transport failure
    #[error("Source unavailable: {reason}")]
    Unavailable { reason: String },

    /// The source responded with malformed tabular data
    #[error("Malformed source data: {reason}")]
    Malformed { reason: String },

    /// The named source does not exist on the backend
    #[error("Source not found: {key}")]
    UnknownSource { key: String },
}

impl From<FetchError> for TsError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unavailable { reason } => TsError::new(TsErrorKind::SourceFetch)
                .with_op("fetch")
                .with_message(format!("Source unavailable: {}", reason)),

            FetchError::Malformed { reason } => TsError::new(TsErrorKind::SourceFetch)
                .with_op("fetch")
                .with_message(format!("Malformed source data: {}", reason)),

            FetchError::UnknownSource { key } => TsError::new(TsErrorKind::SourceFetch)
                .with_op("fetch")
                .with_source_key(key)
                .with_message("Source not found"),
        }
    }
}

/// Conversion from serde_json::Error to TsError
impl From<serde_json::Error> for TsError {
    fn from(err: serde_json::Error) -> Self {
        TsError::new(TsErrorKind::Serialization).with_message(err.to_string())
    }
}
