//! # Study Assist
//!
//! 学习助手后端核心：从 PDF 出题、批改、解析错题、提取薄弱点
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 解析层（Parser）
//! - `parser/` - 把模型回复的纯文本转换为题目、解析、薄弱点；无 I/O
//! - `models/` - 题目、测验、对话、学习单元等数据结构
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `DocumentService` - PDF 文本提取能力
//! - `LlmService` - 文本生成能力
//! - `ConversationTracker` - 只追加的对话记录
//! - `QuizScorer` - 批改能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个学习单元"的完整处理流程
//! - `SectionCtx` - 上下文封装（section_id + user_id）
//! - `SectionFlow` - 状态机（出题 → 批改 → 解析 → 薄弱点）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 组装服务，命令行入口
//! - `orchestrator/views` - 只读查看接口
//!
//! 持久化通过 `store::Store` 接口完成，`MemoryStore` 是内存实现。
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, QuizVariant};
pub use error::{AppError, AppResult};
pub use models::{Answer, Question, Quiz, Section, SectionState, Stage, TopicList};
pub use orchestrator::{App, SectionDetail, SectionViews};
pub use services::{TextExtractor, TextGenerator};
pub use store::{MemoryStore, Store};
pub use workflow::{SectionCtx, SectionFlow, SubmitOutcome};
