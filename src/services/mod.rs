//! 业务能力层
//!
//! 每个服务只描述"我能做什么"，不关心流程顺序

pub mod conversation_tracker;
pub mod document_service;
pub mod llm_service;
pub mod quiz_scorer;

pub use conversation_tracker::ConversationTracker;
pub use document_service::DocumentService;
pub use llm_service::LlmService;
pub use quiz_scorer::{GradeResult, QuizScorer};

use crate::error::AppResult;
use async_trait::async_trait;

/// 文档文本提取能力
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// 从文件链接提取纯文本
    async fn extract_text(&self, file_link: &str) -> AppResult<String>;
}

/// 文本生成能力
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// 发送完整的提示词，返回模型的回复文本
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
