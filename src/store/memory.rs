//! 内存存储
//!
//! 每类聚合一张表，标识符为 UUID 字符串。条件更新与比较后追加都在同一把
//! 写锁内完成，因此对同一测验 / 对话的并发请求不会互相覆盖。

use crate::error::{AppError, AppResult, StoreError};
use crate::models::{
    AnswerList, Conversation, ConversationTurn, PdfDocument, Quiz, Section, SectionState,
};
use crate::store::Store;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

const PDF: &str = "文档";
const QUIZ: &str = "测验";
const CONVERSATION: &str = "对话";
const SECTION: &str = "学习单元";
const ANSWER_LIST: &str = "答案记录";

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    pdfs: RwLock<HashMap<Uuid, PdfDocument>>,
    quizzes: RwLock<HashMap<Uuid, Quiz>>,
    conversations: RwLock<HashMap<Uuid, Conversation>>,
    sections: RwLock<HashMap<Uuid, Section>>,
    answer_lists: RwLock<HashMap<Uuid, AnswerList>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 校验并解析标识符
fn parse_id(kind: &'static str, id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::InvalidId {
        kind,
        id: id.to_string(),
    })
}

async fn insert<T>(
    table: &RwLock<HashMap<Uuid, T>>,
    kind: &'static str,
    mut value: T,
    set_id: impl FnOnce(&mut T, String),
) -> String {
    let id = Uuid::new_v4();
    set_id(&mut value, id.to_string());
    table.write().await.insert(id, value);
    debug!("新建{}: {}", kind, id);
    id.to_string()
}

async fn find<T: Clone>(
    table: &RwLock<HashMap<Uuid, T>>,
    kind: &'static str,
    id: &str,
) -> AppResult<T> {
    let key = parse_id(kind, id)?;
    table
        .read()
        .await
        .get(&key)
        .cloned()
        .ok_or_else(|| AppError::not_found(kind, id))
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_pdf(&self, pdf: PdfDocument) -> AppResult<String> {
        Ok(insert(&self.pdfs, PDF, pdf, |p, id| p.id = id).await)
    }

    async fn find_pdf(&self, id: &str) -> AppResult<PdfDocument> {
        find(&self.pdfs, PDF, id).await
    }

    async fn insert_quiz(&self, quiz: Quiz) -> AppResult<String> {
        Ok(insert(&self.quizzes, QUIZ, quiz, |q, id| q.id = id).await)
    }

    async fn find_quiz(&self, id: &str) -> AppResult<Quiz> {
        find(&self.quizzes, QUIZ, id).await
    }

    async fn mark_quiz_taken(&self, id: &str) -> AppResult<bool> {
        let key = parse_id(QUIZ, id)?;
        let mut quizzes = self.quizzes.write().await;
        let quiz = quizzes.get_mut(&key).ok_or_else(|| AppError::not_found(QUIZ, id))?;
        let previously_taken = quiz.taken;
        quiz.taken = true;
        Ok(previously_taken)
    }

    async fn insert_conversation(&self, conversation: Conversation) -> AppResult<String> {
        Ok(insert(&self.conversations, CONVERSATION, conversation, |c, id| c.id = id).await)
    }

    async fn find_conversation(&self, id: &str) -> AppResult<Conversation> {
        find(&self.conversations, CONVERSATION, id).await
    }

    async fn append_turn(
        &self,
        id: &str,
        expected_len: usize,
        turn: ConversationTurn,
    ) -> AppResult<usize> {
        let key = parse_id(CONVERSATION, id)?;
        let mut conversations = self.conversations.write().await;
        let conversation = conversations
            .get_mut(&key)
            .ok_or_else(|| AppError::not_found(CONVERSATION, id))?;

        if conversation.turns.len() != expected_len {
            return Err(StoreError::AppendConflict {
                id: id.to_string(),
                expected: expected_len,
                actual: conversation.turns.len(),
            }
            .into());
        }

        conversation.turns.push(turn);
        Ok(conversation.turns.len())
    }

    async fn insert_section(&self, section: Section) -> AppResult<String> {
        Ok(insert(&self.sections, SECTION, section, |s, id| s.id = id).await)
    }

    async fn find_section(&self, id: &str, user_id: &str) -> AppResult<Section> {
        let section = find(&self.sections, SECTION, id).await?;
        // 其他用户的学习单元视为不存在
        if section.created_by != user_id {
            return Err(AppError::not_found(SECTION, id));
        }
        Ok(section)
    }

    async fn attach_quiz(
        &self,
        id: &str,
        quiz_id: &str,
        conversation_id: &str,
    ) -> AppResult<bool> {
        let key = parse_id(SECTION, id)?;
        let mut sections = self.sections.write().await;
        let section = sections
            .get_mut(&key)
            .ok_or_else(|| AppError::not_found(SECTION, id))?;

        if section.quiz_id.is_some() {
            return Ok(false);
        }
        section.quiz_id = Some(quiz_id.to_string());
        section.conversation_id = Some(conversation_id.to_string());
        section.state = section.state.max(SectionState::QuizGenerated);
        Ok(true)
    }

    async fn advance_section(
        &self,
        id: &str,
        state: SectionState,
        answers_id: Option<String>,
    ) -> AppResult<Section> {
        let key = parse_id(SECTION, id)?;
        let mut sections = self.sections.write().await;
        let section = sections
            .get_mut(&key)
            .ok_or_else(|| AppError::not_found(SECTION, id))?;

        section.state = section.state.max(state);
        if section.answers_id.is_none() {
            section.answers_id = answers_id;
        }
        debug!("学习单元 {} 状态: {}", id, section.state);
        Ok(section.clone())
    }

    async fn list_sections(&self, user_id: &str) -> AppResult<Vec<Section>> {
        let mut sections: Vec<Section> = self
            .sections
            .read()
            .await
            .values()
            .filter(|s| s.created_by == user_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.created_at);
        Ok(sections)
    }

    async fn insert_answer_list(&self, answers: AnswerList) -> AppResult<String> {
        Ok(insert(&self.answer_lists, ANSWER_LIST, answers, |a, id| a.id = id).await)
    }

    async fn find_answer_list(&self, id: &str) -> AppResult<AnswerList> {
        find(&self.answer_lists, ANSWER_LIST, id).await
    }
}
