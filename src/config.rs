use std::str::FromStr;

use tracing::info;

use crate::error::ConfigError;
use crate::models::FeatureField;

/// 运行模式
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// 驱动浏览器中的表单页面
    Browser,
    /// 批量提交 TOML 球员档案
    Profiles,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "browser" => Ok(RunMode::Browser),
            "profiles" => Ok(RunMode::Profiles),
            other => Err(format!("未知运行模式: {}", other)),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 应用名称，同时用于匹配已打开的表单页面标题
    pub app_name: String,
    pub app_version: String,
    pub run_mode: RunMode,
    /// 评分服务地址（档案模式下直接请求）
    pub service_base_url: String,
    /// 表单页面地址
    pub target_url: String,
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 是否启动无头浏览器（否则连接调试端口）
    pub headless: bool,
    /// 无头模式下的浏览器可执行文件
    pub browser_executable: Option<String>,
    /// 提交前先加载示例数据
    pub load_sample_data: bool,
    /// 球员档案目录
    pub profile_folder: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "NBA Injury Risk Predictor".to_string(),
            app_version: "1.0.0".to_string(),
            run_mode: RunMode::Browser,
            service_base_url: "http://127.0.0.1:4000".to_string(),
            target_url: "http://127.0.0.1:4000/".to_string(),
            browser_debug_port: 9222,
            headless: false,
            browser_executable: None,
            load_sample_data: false,
            profile_folder: "profiles".to_string(),
            output_log_file: "output.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从环境变量读取配置，缺失或无法解析时使用默认值
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            app_name: lookup("APP_NAME").unwrap_or(default.app_name),
            app_version: lookup("APP_VERSION").unwrap_or(default.app_version),
            run_mode: lookup("RUN_MODE").and_then(|v| v.parse().ok()).unwrap_or(default.run_mode),
            service_base_url: lookup("SERVICE_BASE_URL").unwrap_or(default.service_base_url),
            target_url: lookup("TARGET_URL").unwrap_or(default.target_url),
            browser_debug_port: parse_var(&lookup, "BROWSER_DEBUG_PORT").unwrap_or(default.browser_debug_port),
            headless: parse_var(&lookup, "HEADLESS").unwrap_or(default.headless),
            browser_executable: lookup("BROWSER_EXECUTABLE").filter(|v| !v.trim().is_empty()),
            load_sample_data: parse_var(&lookup, "LOAD_SAMPLE_DATA").unwrap_or(default.load_sample_data),
            profile_folder: lookup("PROFILE_FOLDER").unwrap_or(default.profile_folder),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 检查配置，返回发现的全部问题
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.service_base_url.trim().is_empty() {
            errors.push(ConfigError::Missing {
                name: "SERVICE_BASE_URL",
            });
        } else if !is_http_url(&self.service_base_url) {
            errors.push(ConfigError::InvalidUrl {
                name: "SERVICE_BASE_URL",
                value: self.service_base_url.clone(),
            });
        }

        if self.run_mode == RunMode::Browser {
            if self.target_url.trim().is_empty() {
                errors.push(ConfigError::Missing { name: "TARGET_URL" });
            }
            if !self.headless && self.browser_debug_port == 0 {
                errors.push(ConfigError::OutOfRange {
                    name: "BROWSER_DEBUG_PORT",
                    value: self.browser_debug_port.to_string(),
                });
            }
        }

        if self.run_mode == RunMode::Profiles && self.profile_folder.trim().is_empty() {
            errors.push(ConfigError::Missing {
                name: "PROFILE_FOLDER",
            });
        }

        errors
    }

    /// 输出当前配置
    pub fn log_status(&self) {
        info!("{}", "=".repeat(60));
        info!("{} v{} - 配置状态", self.app_name, self.app_version);
        info!("{}", "=".repeat(60));
        info!("运行模式: {:?}", self.run_mode);
        info!("评分服务: {}", self.service_base_url);
        info!("表单页面: {}", self.target_url);
        if self.headless {
            info!(
                "浏览器: 无头模式 ({})",
                self.browser_executable.as_deref().unwrap_or("自动查找")
            );
        } else {
            info!("浏览器: 调试端口 {}", self.browser_debug_port);
        }
        info!("档案目录: {}", self.profile_folder);
        info!("详细日志: {}", self.verbose_logging);
        info!("{}", "-".repeat(60));
        let keys: Vec<&str> = FeatureField::ALL.iter().map(|f| f.key()).collect();
        info!("模型特征: {}", keys.join(", "));
        info!("{}", "=".repeat(60));
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|v| v.trim().parse().ok())
}

fn is_http_url(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.run_mode, RunMode::Browser);
        assert_eq!(config.service_base_url, "http://127.0.0.1:4000");
        assert!(config.validate().is_empty());
    }

    #[test]
    fn reads_overrides_and_ignores_unparsable_values() {
        let config = Config::from_lookup(lookup_from(&[
            ("RUN_MODE", "Profiles"),
            ("SERVICE_BASE_URL", "https://scoring.example.com"),
            ("BROWSER_DEBUG_PORT", "not-a-port"),
            ("HEADLESS", "true"),
            ("BROWSER_EXECUTABLE", "  "),
            ("VERBOSE_LOGGING", "true"),
        ]));

        assert_eq!(config.run_mode, RunMode::Profiles);
        assert_eq!(config.service_base_url, "https://scoring.example.com");
        assert_eq!(config.browser_debug_port, 9222);
        assert!(config.headless);
        assert_eq!(config.browser_executable, None);
        assert!(config.verbose_logging);
    }

    #[test]
    fn validate_collects_every_problem() {
        let config = Config {
            service_base_url: "ftp://scoring".to_string(),
            target_url: String::new(),
            browser_debug_port: 0,
            ..Config::default()
        };

        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ConfigError::InvalidUrl { name: "SERVICE_BASE_URL", .. }));
        assert_eq!(errors[1], ConfigError::Missing { name: "TARGET_URL" });
    }

    #[test]
    fn run_mode_parsing() {
        assert_eq!("browser".parse::<RunMode>(), Ok(RunMode::Browser));
        assert_eq!(" PROFILES ".parse::<RunMode>(), Ok(RunMode::Profiles));
        assert!("batch".parse::<RunMode>().is_err());
    }
}
