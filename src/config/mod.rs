use anyhow::Context;
use config::{Config, FileFormat};
use serde::Deserialize;
use std::sync::LazyLock;

pub static CONFIG: LazyLock<AppConfig> =
    LazyLock::new(|| AppConfig::load().expect("Failed to initialize config"));

/// Question.Order 的计数策略（历史脚本两种写法都存在，收敛为显式配置）
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// 每个 Quiz 内从 1 开始独立计数（默认）
    PerQuiz,
    /// 全局行号（1-based）
    Global,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 记录缺失 Category 时使用的默认分类名
    #[serde(default = "default_category")]
    pub default_category: String,
    /// 记录与命令行都未提供 Collection 时的默认集合名
    #[serde(default = "default_collection")]
    pub default_collection: String,
    #[serde(default = "default_passmark")]
    pub default_passmark: u32,
    #[serde(default = "default_points")]
    pub default_points: u32,
    #[serde(default = "default_instructor")]
    pub instructor_name: String,
    /// Scenario 文本的最小有效长度（≤ 该值视为占位文本，不建 Scenario 行）
    #[serde(default = "default_scenario_min_len")]
    pub scenario_min_len: usize,
    /// 单个 Quiz 最多推断的标签数
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
    #[serde(default = "default_order_policy")]
    pub order_policy: OrderPolicy,
    /// 题库后端地址（图片上传协作方）
    #[serde(default = "default_backend_base_url")]
    pub backend_base_url: String,
    pub backend_email: Option<String>,
    pub backend_password: Option<String>,
}

fn default_category() -> String {
    "IT & Technology".to_string()
}
fn default_collection() -> String {
    "General Certification".to_string()
}
fn default_passmark() -> u32 {
    70
}
fn default_points() -> u32 {
    1
}
fn default_instructor() -> String {
    "Demo Instructor".to_string()
}
fn default_scenario_min_len() -> usize {
    15
}
fn default_max_tags() -> usize {
    8
}
fn default_order_policy() -> OrderPolicy {
    OrderPolicy::PerQuiz
}
fn default_backend_base_url() -> String {
    "https://devbackend.succeedquiz.com".to_string()
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config: AppConfig = Config::builder()
            .add_source(
                config::File::with_name("application")
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .try_parsing(true)
                    .separator("_")
                    .list_separator(","),
            )
            .build()
            .with_context(|| anyhow::anyhow!("Failed to load config"))?
            .try_deserialize()
            .with_context(|| anyhow::anyhow!("Failed to deserialize config"))?;

        Ok(config)
    }
}

pub fn get() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_defaults() {
        let config = AppConfig::load().expect("Failed to load config");
        assert_eq!(config.default_category, "IT & Technology");
        assert_eq!(config.default_passmark, 70);
        assert_eq!(config.order_policy, OrderPolicy::PerQuiz);
    }
}
