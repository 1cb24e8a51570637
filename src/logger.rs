use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别
/// 默认级别: info
///
/// 示例:
/// - RUST_LOG=debug configurator-smoke run
/// - RUST_LOG=configurator_smoke::runner=trace configurator-smoke run
///
/// `ansi` 为 false 时日志不输出颜色控制符
pub fn init_logger(ansi: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logger initialized");
}

/// 日志是否使用颜色：`--no-color` 或非空的 NO_COLOR 环境变量都会关闭颜色
pub fn ansi_allowed(no_color_flag: bool) -> bool {
    !no_color_flag && std::env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_flag_disables_ansi() {
        assert!(!ansi_allowed(true));
    }
}
