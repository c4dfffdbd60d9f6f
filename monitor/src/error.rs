use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("FEED_SUBSCRIBE is not valid json: {0}")]
    Subscribe(#[from] serde_json::Error),
}
