use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时处理的任务数量
    pub max_concurrent_jobs: usize,
    /// 任务 TOML 文件存放目录
    pub job_folder: String,
    /// 词频表文件（TSV，可选）
    pub lookup_file: Option<String>,
    /// 导出卡片文件
    pub export_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 生成后是否逐张审查
    pub lint_enabled: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_effort: Effort,
    pub llm_tier: Tier,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 4,
            job_folder: "jobs".to_string(),
            lookup_file: None,
            export_file: "cards.toml".to_string(),
            verbose_logging: false,
            lint_enabled: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_effort: Effort::Medium,
            llm_tier: Tier::Standard,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_jobs: std::env::var("MAX_CONCURRENT_JOBS").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(default.max_concurrent_jobs),
            job_folder: std::env::var("JOB_FOLDER").unwrap_or(default.job_folder),
            lookup_file: std::env::var("LOOKUP_FILE").ok().filter(|v| !v.trim().is_empty()).or(default.lookup_file),
            export_file: std::env::var("EXPORT_FILE").unwrap_or(default.export_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            lint_enabled: std::env::var("LINT_ENABLED").ok().and_then(|v| v.parse().ok()).unwrap_or(default.lint_enabled),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            llm_effort: std::env::var("LLM_EFFORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_effort),
            llm_tier: std::env::var("LLM_TIER").ok().and_then(|v| v.parse().ok()).unwrap_or(default.llm_tier),
        }
    }

    /// 每次调用模型时显式传入的模型配置
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            model: self.llm_model_name.clone(),
            effort: self.llm_effort,
            tier: self.llm_tier,
        }
    }
}

/// 单次模型调用的配置
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model: String,
    pub effort: Effort,
    pub tier: Tier,
}

impl ModelConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            effort: Effort::Medium,
            tier: Tier::Standard,
        }
    }
}

/// 推理强度
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// 输出 token 上限
    pub fn max_tokens(self) -> u32 {
        match self {
            Effort::Low => 1024,
            Effort::Medium => 2048,
            Effort::High => 4096,
        }
    }

    /// 采样温度
    pub fn temperature(self) -> f32 {
        match self {
            Effort::Low => 0.2,
            Effort::Medium => 0.3,
            Effort::High => 0.5,
        }
    }
}

impl FromStr for Effort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Effort::Low),
            "medium" => Ok(Effort::Medium),
            "high" => Ok(Effort::High),
            other => Err(format!("未知的推理强度: {}", other)),
        }
    }
}

/// 服务等级
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Flex,
    Priority,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Standard => "standard",
            Tier::Flex => "flex",
            Tier::Priority => "priority",
        }
    }
}

impl FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Ok(Tier::Standard),
            "flex" => Ok(Tier::Flex),
            "priority" => Ok(Tier::Priority),
            other => Err(format!("未知的服务等级: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effort_and_tier_parsing() {
        assert_eq!("HIGH".parse::<Effort>().unwrap(), Effort::High);
        assert_eq!(" low ".parse::<Effort>().unwrap(), Effort::Low);
        assert!("extreme".parse::<Effort>().is_err());

        assert_eq!("default".parse::<Tier>().unwrap(), Tier::Standard);
        assert_eq!("Flex".parse::<Tier>().unwrap(), Tier::Flex);
        assert!("gold".parse::<Tier>().is_err());
    }

    #[test]
    fn test_model_config_follows_config() {
        let config = Config {
            llm_model_name: "test-model".to_string(),
            llm_effort: Effort::High,
            llm_tier: Tier::Priority,
            ..Default::default()
        };

        let model_config = config.model_config();
        assert_eq!(model_config.model, "test-model");
        assert_eq!(model_config.effort, Effort::High);
        assert_eq!(model_config.tier, Tier::Priority);
        assert_eq!(model_config.effort.max_tokens(), 4096);
    }
}
