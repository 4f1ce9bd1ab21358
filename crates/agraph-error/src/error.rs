//! The Error type shared by every agraph crate.

use std::fmt;
use std::io;

use crate::ErrorKind;

type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An agraph failure: what went wrong, where, and the inputs involved.
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<BoxedSource>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Input parsed but violates a rule, e.g. a duplicate artifact id.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFormat, message)
    }

    /// Input could not be decoded at all.
    pub fn deserialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeserializationFailed, message)
    }

    /// A report was closed before its output file was configured.
    pub fn no_log_output(report: impl Into<String>) -> Self {
        let report = report.into();
        let message = format!("the log target is not configured for '{report}'");
        Self::new(ErrorKind::ConfigInvalid, message).with_context("report", report)
    }

    /// An io failure while touching `path`.
    pub fn io_at(err: io::Error, path: impl Into<String>) -> Self {
        Self::from(err).with_context("path", path)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Innermost-last operation name, e.g. `report::close`. Empty when unset.
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// First context value recorded under `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find_map(|(k, v)| (*k == key).then_some(v.as_str()))
    }

    pub fn source_ref(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    /// Record the failing operation. An earlier operation is kept in the
    /// context under `called`, so the chain reads outermost first.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            let inner = std::mem::replace(&mut self.operation, operation);
            self.context.push(("called", inner.to_string()));
        } else {
            self.operation = operation;
        }
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the underlying error. Only one source may be set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

// `InvalidFormat at manifest::build (id: x) => duplicate artifact id 'x'`
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect();
            write!(f, " ({})", pairs.join(", "))?;
        }
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Error");
        debug
            .field("kind", &self.kind)
            .field("operation", &self.operation)
            .field("message", &self.message);
        for (key, value) in &self.context {
            debug.field(key, value);
        }
        if let Some(source) = &self.source {
            debug.field("source", source);
        }
        debug.finish()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}
