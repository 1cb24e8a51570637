use std::fmt;
use std::time::Duration;

/// 服务级保护范围捕获失败时使用的通用方法名
pub const GENERAL_METHOD: &str = "general";

/// 测试结果附带的数据
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// 被测方法的返回值
    Value(serde_json::Value),
    /// 捕获到的错误
    Error(String),
}

impl Payload {
    pub fn as_error(&self) -> Option<&str> {
        match self {
            Payload::Error(e) => Some(e),
            Payload::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            Payload::Value(v) => Some(v),
            Payload::Error(_) => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Value(v) => write!(f, "{}", v),
            Payload::Error(e) => write!(f, "{}", e),
        }
    }
}

/// 单个被测方法的执行结果
#[derive(Debug, Clone)]
pub struct TestResult {
    /// 被测服务名称
    pub service: String,

    /// 被测方法名称
    pub method: String,

    /// 是否成功
    pub success: bool,

    /// 可读的结果描述
    pub message: String,

    /// 成功时为返回值，失败时为错误
    pub data: Option<Payload>,

    /// 调用耗时
    pub duration: Duration,
}

impl TestResult {
    pub fn passed(
        service: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
        duration: Duration,
    ) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            success: true,
            message: message.into(),
            data: data.map(Payload::Value),
            duration,
        }
    }

    /// 方法返回了，但返回值没有通过检查
    pub fn rejected(
        service: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
        data: Option<serde_json::Value>,
        duration: Duration,
    ) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            success: false,
            message: message.into(),
            data: data.map(Payload::Value),
            duration,
        }
    }

    /// 方法调用本身失败
    pub fn error(
        service: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            service: service.into(),
            method: method.into(),
            success: false,
            message: message.into(),
            data: Some(Payload::Error(error.into())),
            duration,
        }
    }

    pub fn error_payload(&self) -> Option<&str> {
        self.data.as_ref().and_then(Payload::as_error)
    }
}

/// 测试摘要
#[derive(Debug, Clone, PartialEq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub total_duration: Duration,
}

impl TestSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        let total_duration = results.iter().map(|r| r.duration).sum();

        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            total_duration,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
