use serde::Deserialize;

/// 服务调用失败时的归属范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureScope {
    /// 整个服务共用一个保护范围：首个失败中止该服务剩余调用，
    /// 记录为一条通用（`general`）失败结果
    #[default]
    Service,
    /// 每个方法单独保护：失败归属到具体方法，后续调用继续执行
    Method,
}

/// 测试工具配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// 成功的结果也输出返回数据
    pub verbose: bool,

    /// 彩色输出
    pub color: bool,

    pub failure_scope: FailureScope,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            color: true,
            failure_scope: FailureScope::Service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harness_config_parse() {
        let toml_str = r#"
verbose = true
failure_scope = "method"
"#;

        let config: HarnessConfig = toml::from_str(toml_str).unwrap();
        assert!(config.verbose);
        assert!(config.color);
        assert_eq!(config.failure_scope, FailureScope::Method);
    }

    #[test]
    fn test_harness_config_empty_uses_defaults() {
        let config: HarnessConfig = toml::from_str("").unwrap();
        assert_eq!(config, HarnessConfig::default());
    }

    #[test]
    fn test_unknown_scope_rejected() {
        let result = toml::from_str::<HarnessConfig>(r#"failure_scope = "global""#);
        assert!(result.is_err());
    }
}
