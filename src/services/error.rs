/// 服务调用失败的原因
///
/// 服务实现通过返回 `Err` 表示调用失败，测试工具只关心失败本身，
/// 不会根据具体变体改变处理方式。
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("service not initialized")]
    NotInitialized,

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type returned by every service method
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
