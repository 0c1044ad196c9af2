use thiserror::Error;

/// Errors raised while building an engine from configuration.
///
/// Analysis never fails once an engine exists; every problem the engine can
/// have is caught here, at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("speaker marker `{0}` must not be empty")]
    EmptyMarker(&'static str),

    #[error("user and operator markers must differ (both are `{0}`)")]
    IdenticalMarkers(String),

    #[error("{name} must be within {min}..={max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("severity cutoffs must be strictly descending: {0:?}")]
    UnorderedSeverity([u32; 4]),

    #[error("at least one national pool department label is required")]
    NoNationalDepartments,

    #[error("failed to compile phrase set `{set}`: {source}")]
    PhraseSet {
        set: &'static str,
        #[source]
        source: regex::Error,
    },
}
