use crate::config::types::HarnessConfig;
use crate::{Result, SmokeError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "configurator-smoke.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<HarnessConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SmokeError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config = toml::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录
    /// 2. 父目录递归查找
    /// 3. 用户配置目录 ~/.config/configurator-smoke/
    ///
    /// 都找不到时返回 `Ok(None)`；找到但解析失败时返回错误。
    pub fn find_and_load() -> Result<Option<HarnessConfig>> {
        match Self::find_config_path() {
            Some(path) => Self::load_from_path(path).map(Some),
            None => Ok(None),
        }
    }

    /// 加载配置：显式路径优先，否则自动查找，最后回退到默认值
    pub fn load(explicit: Option<&Path>) -> Result<HarnessConfig> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        Ok(Self::find_and_load()?.unwrap_or_default())
    }

    fn find_config_path() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_upwards(current).or_else(Self::user_config_path)
    }

    /// 从 `start` 开始逐级向上查找配置文件
    fn find_upwards(mut current: PathBuf) -> Option<PathBuf> {
        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                return None;
            }
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home
            .join(".config")
            .join("configurator-smoke")
            .join(Self::CONFIG_FILE);

        config_path.exists().then_some(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailureScope;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_from_path() {
        let config_content = r#"
verbose = true
color = false
failure_scope = "method"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
        assert!(config.verbose);
        assert!(!config.color);
        assert_eq!(config.failure_scope, FailureScope::Method);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = ConfigLoader::load_from_path(temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(SmokeError::Config(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"verbose = \"yes\"").unwrap();
        temp_file.flush().unwrap();

        let result = ConfigLoader::load_from_path(temp_file.path());
        assert!(matches!(result, Err(SmokeError::Toml(_))));
    }

    #[test]
    fn test_find_upwards() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        let config_path = temp_dir.path().join(ConfigLoader::CONFIG_FILE);
        fs::write(&config_path, "verbose = true\n").unwrap();

        let found = ConfigLoader::find_upwards(nested).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_explicit_path_wins() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"color = false\n").unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load(Some(temp_file.path())).unwrap();
        assert!(!config.color);
    }
}
