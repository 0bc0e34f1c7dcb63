use thiserror::Error;

/// Result type alias using AuditError
pub type Result<T> = std::result::Result<T, AuditError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidConfig,
    MalformedFieldSpec,
    UnsupportedDescriptorKind,

    // Rendering
    /// A temporal value (or its counterpart) could not be coerced to a timestamp
    InvalidTemporal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::MalformedFieldSpec => "ERR_MALFORMED_FIELD_SPEC",
            ExErrorKind::UnsupportedDescriptorKind => "ERR_UNSUPPORTED_DESCRIPTOR_KIND",
            ExErrorKind::InvalidTemporal => "ERR_INVALID_TEMPORAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, structural path, human label) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    label: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            label: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add structural path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add label path context
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(label) = &self.label {
            write!(f, " (label: {})", label)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy for descriptor construction and value rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuditError {
    /// A value paired with a timestamp could not be read as a timestamp
    #[error("Value at '{path}' is not a valid timestamp: {input}")]
    InvalidTemporal { path: String, input: String },

    /// Configuration document could not be parsed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A field-map entry is neither a label nor a nested descriptor
    #[error("Field map entry '{key}' is neither a label nor a nested descriptor")]
    MalformedFieldSpec { key: String },

    /// Descriptor kind outside of `object` / `array`
    #[error("Unsupported descriptor kind: {kind}")]
    UnsupportedDescriptorKind { kind: String },
}

impl From<AuditError> for ExError {
    fn from(err: AuditError) -> Self {
        match err {
            AuditError::InvalidTemporal { path, input } => {
                ExError::new(ExErrorKind::InvalidTemporal)
                    .with_op("compare_value")
                    .with_path(path)
                    .with_message(format!("cannot read '{}' as a timestamp", input))
            }
            AuditError::InvalidConfig { reason } => ExError::new(ExErrorKind::InvalidConfig)
                .with_op("load_config")
                .with_message(reason),
            AuditError::MalformedFieldSpec { key } => {
                ExError::new(ExErrorKind::MalformedFieldSpec)
                    .with_op("load_config")
                    .with_path(key)
                    .with_message("entry is neither a label nor a nested descriptor")
            }
            AuditError::UnsupportedDescriptorKind { kind } => {
                ExError::new(ExErrorKind::UnsupportedDescriptorKind)
                    .with_op("load_config")
                    .with_message(format!("descriptor kind '{}' is not object or array", kind))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes() {
        let cases = [
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
            (ExErrorKind::MalformedFieldSpec, "ERR_MALFORMED_FIELD_SPEC"),
            (
                ExErrorKind::UnsupportedDescriptorKind,
                "ERR_UNSUPPORTED_DESCRIPTOR_KIND",
            ),
            (ExErrorKind::InvalidTemporal, "ERR_INVALID_TEMPORAL"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_invalid_temporal_converts_with_path() {
        let err: ExError = AuditError::InvalidTemporal {
            path: "edited".to_string(),
            input: "yesterday".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidTemporal);
        assert_eq!(err.path(), Some("edited"));
        assert_eq!(err.op(), Some("compare_value"));
        assert!(err.message().contains("yesterday"));
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::InvalidConfig)
            .with_op("load_config")
            .with_message("missing fields");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_INVALID_CONFIG]"));
        assert!(rendered.contains("load_config"));
        assert!(rendered.contains("missing fields"));
    }

    #[test]
    fn test_source_chain() {
        let inner = ExError::new(ExErrorKind::InvalidTemporal).with_message("bad date");
        let outer = ExError::new(ExErrorKind::InvalidConfig).with_source(inner);
        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::InvalidTemporal)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
