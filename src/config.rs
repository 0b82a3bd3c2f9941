use crate::error::{AppResult, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 测验题目数量（对应两种出题提示词）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizVariant {
    /// 10 道题
    Short,
    /// 20 道题
    Long,
}

impl QuizVariant {
    pub fn question_count(self) -> usize {
        match self {
            QuizVariant::Short => 10,
            QuizVariant::Long => 20,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "10" | "short" => Some(QuizVariant::Short),
            "20" | "long" => Some(QuizVariant::Long),
            _ => None,
        }
    }
}

/// 程序配置
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    // --- 文档提取 API 配置 ---
    pub pdfco_api_key: String,
    pub pdfco_api_base_url: String,
    // --- 流程配置 ---
    /// 出题数量
    pub quiz_variant: QuizVariant,
    /// 外部调用超时（秒）
    pub upstream_timeout_secs: u64,
    /// 命令行运行时处理的文档链接
    pub source_document_link: Option<String>,
    /// 命令行运行时的用户标识
    pub source_user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose_logging: false,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-flash".to_string(),
            llm_temperature: 0.3,
            pdfco_api_key: String::new(),
            pdfco_api_base_url: "https://api.pdf.co/v1".to_string(),
            quiz_variant: QuizVariant::Long,
            upstream_timeout_secs: 120,
            source_document_link: None,
            source_user_id: "local".to_string(),
        }
    }
}

impl Config {
    /// 只从环境变量加载（缺失的字段使用默认值）
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载，再用环境变量覆盖
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })?;
        config.with_env_overrides()
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        let current = self;
        Ok(Self {
            verbose_logging: parse_env("VERBOSE_LOGGING", "bool")?.unwrap_or(current.verbose_logging),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(current.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(current.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(current.llm_model_name),
            llm_temperature: parse_env("LLM_TEMPERATURE", "f32")?.unwrap_or(current.llm_temperature),
            pdfco_api_key: std::env::var("PDFCO_API_KEY").unwrap_or(current.pdfco_api_key),
            pdfco_api_base_url: std::env::var("PDFCO_API_BASE_URL").unwrap_or(current.pdfco_api_base_url),
            quiz_variant: match std::env::var("QUIZ_VARIANT") {
                Ok(value) => QuizVariant::parse(&value).ok_or_else(|| ConfigError::EnvVarParseFailed {
                    var_name: "QUIZ_VARIANT".to_string(),
                    value,
                    expected_type: "10 | 20".to_string(),
                })?,
                Err(_) => current.quiz_variant,
            },
            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", "u64")?
                .unwrap_or(current.upstream_timeout_secs),
            source_document_link: std::env::var("SOURCE_DOCUMENT_LINK")
                .ok()
                .or(current.source_document_link),
            source_user_id: std::env::var("SOURCE_USER_ID").unwrap_or(current.source_user_id),
        })
    }
}

/// 读取并解析环境变量；变量不存在时返回 None，格式错误时报错
fn parse_env<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| {
                ConfigError::EnvVarParseFailed {
                    var_name: var_name.to_string(),
                    value,
                    expected_type: expected_type.to_string(),
                }
                .into()
            }),
        Err(_) => Ok(None),
    }
}
