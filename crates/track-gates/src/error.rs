use std::path::PathBuf;

/// Errors reported by the command line tool
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: track_gates_lib::DataError,
    },

    #[error(transparent)]
    Data(#[from] track_gates_lib::DataError),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Attach the offending file to a data error
    pub fn input(path: impl Into<PathBuf>) -> impl FnOnce(track_gates_lib::DataError) -> Self {
        let path = path.into();
        move |source| CliError::Input { path, source }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
