/// Errors produced while loading a [`GameConfig`](crate::GameConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document is not valid JSON or has wrongly typed fields.
    #[error("failed to parse game config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but describes an unplayable game.
    #[error("invalid game config field '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: String) -> Self {
        Self::Invalid { field, reason }
    }
}

/// Errors produced by the skin catalog.
#[derive(Debug, thiserror::Error)]
pub enum SkinError {
    #[error("failed to parse skin catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("skin catalog must contain at least one character")]
    Empty,

    #[error("skin id '{0}' appears more than once")]
    DuplicateId(String),

    #[error("no skin with id '{0}'")]
    UnknownSkin(String),
}
