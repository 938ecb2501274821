//! Error kinds and their retry classification.
//!
//! Everything that goes wrong inside an action is an [`ActionError`]. At the
//! lifecycle boundary it is converted exactly once into an [`ActionFailure`]
//! by looking its [`FailureKind`] up in [`ERROR_TABLE`].

use std::io;
use thiserror::Error;

/// Error code reported for kinds that have no entry in [`ERROR_TABLE`].
pub const UNCLASSIFIED_CODE: &str = "HES000";

/// What went wrong, independent of how it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// A host name could not be resolved.
    UnknownHost,
    /// Access to a path or service was denied.
    PermissionDenied,
    /// A local disk ran out of space.
    DiskOutOfSpace,
    /// A filesystem namespace or space quota was exceeded.
    QuotaExceeded,
    /// The filesystem is in protective read-only mode.
    SafeMode,
    /// A remote endpoint refused the connection.
    ConnectionRefused,
    /// The action definition is not well-formed XML.
    MalformedXml,
    /// A referenced path or program does not exist.
    PathNotFound,
    /// Any other I/O failure.
    Io,
    /// Inline configuration tried to set a disallowed property.
    ForbiddenProperty,
    /// A required element is missing or blank.
    MissingField,
    /// Nothing more specific is known.
    Unclassified,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownHost => "unknown-host",
            Self::PermissionDenied => "permission-denied",
            Self::DiskOutOfSpace => "disk-out-of-space",
            Self::QuotaExceeded => "quota-exceeded",
            Self::SafeMode => "safe-mode",
            Self::ConnectionRefused => "connection-refused",
            Self::MalformedXml => "malformed-xml",
            Self::PathNotFound => "path-not-found",
            Self::Io => "io",
            Self::ForbiddenProperty => "forbidden-property",
            Self::MissingField => "missing-field",
            Self::Unclassified => "unclassified",
        }
    }
}

impl From<&io::Error> for FailureKind {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::PathNotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            _ => Self::Io,
        }
    }
}

/// Retry classification reported to the host engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Retrying later may succeed.
    Transient,
    /// Infrastructure problem that a retry will not fix.
    NonTransient,
    /// Bug in the action definition or its environment.
    Error,
    /// The action was refused outright.
    Failed,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transient => "TRANSIENT",
            Self::NonTransient => "NON_TRANSIENT",
            Self::Error => "ERROR",
            Self::Failed => "FAILED",
        }
    }

    /// Whether the host may retry an action that failed with this category.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// One row of the error table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMapping {
    pub kind: FailureKind,
    pub category: ErrorCategory,
    pub code: &'static str,
}

impl ErrorMapping {
    const fn new(kind: FailureKind, category: ErrorCategory, code: &'static str) -> Self {
        Self {
            kind,
            category,
            code,
        }
    }
}

/// Kind → (category, code). Kinds not listed are reported as unclassified
/// [`ErrorCategory::Error`] with [`UNCLASSIFIED_CODE`].
pub const ERROR_TABLE: &[ErrorMapping] = &[
    ErrorMapping::new(FailureKind::UnknownHost, ErrorCategory::Transient, "HES001"),
    ErrorMapping::new(FailureKind::PermissionDenied, ErrorCategory::NonTransient, "JA002"),
    ErrorMapping::new(FailureKind::DiskOutOfSpace, ErrorCategory::NonTransient, "HES003"),
    ErrorMapping::new(FailureKind::QuotaExceeded, ErrorCategory::NonTransient, "HES004"),
    ErrorMapping::new(FailureKind::SafeMode, ErrorCategory::NonTransient, "HES005"),
    ErrorMapping::new(FailureKind::ConnectionRefused, ErrorCategory::Transient, "HES006"),
    ErrorMapping::new(FailureKind::MalformedXml, ErrorCategory::Error, "HES007"),
    ErrorMapping::new(FailureKind::PathNotFound, ErrorCategory::Error, "HES008"),
    ErrorMapping::new(FailureKind::Io, ErrorCategory::Transient, "HES009"),
    ErrorMapping::new(FailureKind::ForbiddenProperty, ErrorCategory::Failed, "JA010"),
    ErrorMapping::new(FailureKind::MissingField, ErrorCategory::Error, "HES010"),
];

/// Look up the category and code for a failure kind.
pub fn classify(kind: FailureKind) -> (ErrorCategory, &'static str) {
    ERROR_TABLE
        .iter()
        .find(|m| m.kind == kind)
        .map(|m| (m.category, m.code))
        .unwrap_or((ErrorCategory::Error, UNCLASSIFIED_CODE))
}

/// Error raised while running an action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("missing required element <{0}>")]
    MissingField(&'static str),
    #[error("malformed action XML: {0}")]
    MalformedXml(String),
    #[error("property [{property}] not allowed in action [{conf_name}] configuration")]
    ForbiddenProperty { property: String, conf_name: String },
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    #[error("tool execution failed: {message}")]
    ToolFailed {
        kind: FailureKind,
        status: Option<i32>,
        message: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
}

impl ActionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::MissingField(_) => FailureKind::MissingField,
            Self::MalformedXml(_) => FailureKind::MalformedXml,
            Self::ForbiddenProperty { .. } => FailureKind::ForbiddenProperty,
            Self::ToolNotFound(_) => FailureKind::PathNotFound,
            Self::ToolFailed { kind, .. } => *kind,
            Self::Io(err) => FailureKind::from(err),
            Self::Unsupported(_) => FailureKind::Unclassified,
        }
    }
}

/// A classified failure, as handed back to the host engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub category: ErrorCategory,
    pub code: &'static str,
    pub message: String,
}

impl ActionFailure {
    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

impl From<ActionError> for ActionFailure {
    fn from(err: ActionError) -> Self {
        let kind = err.kind();
        let (category, code) = classify(kind);
        Self {
            kind,
            category,
            code,
            message: err.to_string(),
        }
    }
}
