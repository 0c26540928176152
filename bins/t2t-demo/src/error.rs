#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("config: {0}")]
    Config(#[from] t2t::ConfigError),

    #[error("read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Transfer(#[from] t2t::TransferError),
}
