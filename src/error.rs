use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error(transparent)]
    Sequence(#[from] SequenceError),
    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error while {context}: {source}")]
    Json {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Misuse of a [`crate::output::SectionedWriter`] session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("writer session is already open")]
    AlreadyOpen,
    #[error("writer session is not open")]
    NotOpen,
    #[error("unbalanced sections: {depth} section(s) still open")]
    UnbalancedSection { depth: usize },
    #[error("stop_section called without a matching start_section")]
    NoOpenSection,
}

impl ScoringError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, source: std::io::Error) -> Self {
        Self::Io { context, source }
    }

    pub(crate) fn json(context: &'static str, source: serde_json::Error) -> Self {
        Self::Json { context, source }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn sequence_error(&self) -> Option<&SequenceError> {
        match self {
            Self::Sequence(err) => Some(err),
            _ => None,
        }
    }
}
