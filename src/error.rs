use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmokeError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("TOML 解析错误: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for configurator-smoke crate
pub type Result<T> = std::result::Result<T, SmokeError>;
