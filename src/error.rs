use thiserror::Error;

/// Errors surfaced by the configurator library.
///
/// None of these halt the frame loop: load failures are logged and leave the
/// vehicle unclassified, command errors are logged and the command dropped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load {asset}: {source}")]
    LoadFailure {
        asset: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("invalid color style `{0}`")]
    InvalidColor(String),
    #[error("invalid command `{0}`")]
    InvalidCommand(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn load(asset: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::LoadFailure {
            asset: asset.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
