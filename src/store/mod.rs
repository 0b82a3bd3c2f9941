//! 持久化接口
//!
//! 五类聚合（文档、测验、对话、学习单元、答案记录）按不透明的字符串标识符
//! 读写，彼此之间不做关联查询。

pub mod memory;

pub use memory::MemoryStore;

use crate::error::AppResult;
use crate::models::{
    AnswerList, Conversation, ConversationTurn, PdfDocument, Quiz, Section, SectionState,
};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    // --- 文档 ---
    async fn insert_pdf(&self, pdf: PdfDocument) -> AppResult<String>;
    async fn find_pdf(&self, id: &str) -> AppResult<PdfDocument>;

    // --- 测验 ---
    async fn insert_quiz(&self, quiz: Quiz) -> AppResult<String>;
    async fn find_quiz(&self, id: &str) -> AppResult<Quiz>;
    /// 条件更新：仅当 `taken` 为 false 时置为 true，返回更新前的值
    async fn mark_quiz_taken(&self, id: &str) -> AppResult<bool>;

    // --- 对话 ---
    async fn insert_conversation(&self, conversation: Conversation) -> AppResult<String>;
    async fn find_conversation(&self, id: &str) -> AppResult<Conversation>;
    /// 比较后追加：只有当前轮数等于 `expected_len` 时才追加，返回新的轮数
    async fn append_turn(
        &self,
        id: &str,
        expected_len: usize,
        turn: ConversationTurn,
    ) -> AppResult<usize>;

    // --- 学习单元 ---
    async fn insert_section(&self, section: Section) -> AppResult<String>;
    /// 只返回属于 `user_id` 的学习单元
    async fn find_section(&self, id: &str, user_id: &str) -> AppResult<Section>;
    /// 挂上测验与对话：只有尚未出题时才写入，返回是否写入
    async fn attach_quiz(
        &self,
        id: &str,
        quiz_id: &str,
        conversation_id: &str,
    ) -> AppResult<bool>;
    /// 推进状态：状态只前进不后退，`answers_id` 只在为空时写入。返回更新后的记录
    async fn advance_section(
        &self,
        id: &str,
        state: SectionState,
        answers_id: Option<String>,
    ) -> AppResult<Section>;
    async fn list_sections(&self, user_id: &str) -> AppResult<Vec<Section>>;

    // --- 答案记录 ---
    async fn insert_answer_list(&self, answers: AnswerList) -> AppResult<String>;
    async fn find_answer_list(&self, id: &str) -> AppResult<AnswerList>;
}
