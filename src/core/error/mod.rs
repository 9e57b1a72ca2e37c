use crate::core::types::{ErrorCategory, ErrorSeverity};
use indexmap::IndexMap;

#[derive(Debug)]
pub struct MigrateError {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    pub code: String,
    pub message: String,
    pub context: IndexMap<String, String>,
    pub source: Option<anyhow::Error>,
}

impl MigrateError {
    pub fn new<T: Into<String>>(category: ErrorCategory, message: T) -> Self {
        let code = match category {
            ErrorCategory::ParseError => "MIG-PARSE",
            ErrorCategory::MissingTree => "MIG-TREE",
            ErrorCategory::TransformerError => "MIG-TRANSFORM",
            ErrorCategory::SerializationError => "MIG-JSON",
            ErrorCategory::ConfigurationError => "MIG-CONFIG",
            ErrorCategory::ValidationError => "MIG-VALIDATE",
            ErrorCategory::IoError => "MIG-IO",
            ErrorCategory::InternalError => "MIG-INTERNAL",
        };
        MigrateError {
            category,
            severity: ErrorSeverity::Error,
            code: code.to_string(),
            message: message.into(),
            context: IndexMap::new(),
            source: None,
        }
    }

    pub fn with_source<T: Into<String>>(
        category: ErrorCategory,
        message: T,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        let mut error = MigrateError::new(category, message);
        error.source = Some(anyhow::anyhow!(source));
        error
    }

    pub fn with_context<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn with_code<T: Into<String>>(mut self, code: T) -> Self {
        self.code = code.into();
        self
    }

    pub fn severity(&self) -> ErrorSeverity {
        self.severity
    }
}

impl std::fmt::Display for MigrateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect();
            write!(f, " ({})", pairs.join(", "))?;
        }
        if let Some(ref source) = self.source {
            write!(f, "\nCaused by: {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for MigrateError {}

impl From<anyhow::Error> for MigrateError {
    fn from(e: anyhow::Error) -> Self {
        let mut error = MigrateError::new(ErrorCategory::InternalError, e.to_string());
        error.source = Some(e);
        error
    }
}

impl From<std::io::Error> for MigrateError {
    fn from(e: std::io::Error) -> Self {
        let mut error = MigrateError::new(ErrorCategory::IoError, e.to_string());
        error.source = Some(anyhow::anyhow!(e));
        error
    }
}

impl From<serde_json::Error> for MigrateError {
    fn from(e: serde_json::Error) -> Self {
        let mut error = MigrateError::new(
            ErrorCategory::SerializationError,
            format!("invalid state JSON: {}", e),
        );
        error.source = Some(anyhow::anyhow!(e));
        error
    }
}

pub trait ErrorReporter {
    fn report_error(&self, error: &MigrateError);
    fn report_warning(&self, message: &str, context: Option<String>);
}

/// Routes reports through `tracing` so they land in every configured sink.
pub struct DefaultErrorReporter;

impl DefaultErrorReporter {
    pub fn new() -> Self {
        DefaultErrorReporter
    }
}

impl Default for DefaultErrorReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorReporter for DefaultErrorReporter {
    fn report_error(&self, error: &MigrateError) {
        tracing::error!(code = %error.code, category = %error.category, "{}", error.message);
        for (key, value) in &error.context {
            tracing::error!("  {}: {}", key, value);
        }
        if let Some(ref source) = error.source {
            tracing::error!("  caused by: {}", source);
        }
    }

    fn report_warning(&self, message: &str, context: Option<String>) {
        match context {
            Some(ctx) => tracing::warn!(context = %ctx, "{}", message),
            None => tracing::warn!("{}", message),
        }
    }
}
