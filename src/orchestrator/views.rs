//! 查看接口 - 编排层
//!
//! 只读：解析结果与薄弱点每次都从对话中重新解析，不单独存储

use std::sync::Arc;
use tracing::debug;

use crate::error::{AppResult, PipelineError};
use crate::models::{QuestionAnswerExplanation, Quiz, Section, SectionState, Stage, TopicList};
use crate::parser::{parse_explanations, parse_topics};
use crate::services::ConversationTracker;
use crate::store::Store;
use crate::workflow::SectionCtx;

/// 学习单元详情
#[derive(Debug, Clone)]
pub struct SectionDetail {
    pub section: Section,
    pub quiz: Option<Quiz>,
    /// 提取薄弱点之后才有
    pub topics: Option<TopicList>,
}

/// 查看服务
#[derive(Clone)]
pub struct SectionViews {
    store: Arc<dyn Store>,
    tracker: ConversationTracker,
}

impl SectionViews {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            tracker: ConversationTracker::new(store.clone()),
            store,
        }
    }

    /// 用户的全部学习单元（按创建时间排序）
    pub async fn section_list(&self, user_id: &str) -> AppResult<Vec<Section>> {
        self.store.list_sections(user_id).await
    }

    /// 学习单元详情：测验与薄弱点并发读取
    pub async fn section_detail(&self, ctx: &SectionCtx) -> AppResult<SectionDetail> {
        let section = self.load_section(ctx).await?;

        let quiz = async {
            match &section.quiz_id {
                Some(id) => self.store.find_quiz(id).await.map(Some),
                None => Ok(None),
            }
        };
        let topics = async {
            if section.state < SectionState::TopicsExtracted {
                return Ok(None);
            }
            match &section.conversation_id {
                Some(id) => self.topics_from(id).await.map(Some),
                None => Ok(None),
            }
        };

        let (quiz, topics) = futures::try_join!(quiz, topics)?;
        debug!("{} 详情: 状态 {}", ctx, section.state);

        Ok(SectionDetail {
            section,
            quiz,
            topics,
        })
    }

    /// 查看测验
    pub async fn view_quiz(&self, ctx: &SectionCtx) -> AppResult<Quiz> {
        let section = self.load_section(ctx).await?;
        match section.quiz_id {
            Some(id) => self.store.find_quiz(&id).await,
            None => Err(PipelineError::QuizNotGenerated {
                section_id: section.id,
            }
            .into()),
        }
    }

    /// 查看答案解析
    pub async fn view_explanations(
        &self,
        ctx: &SectionCtx,
    ) -> AppResult<Vec<QuestionAnswerExplanation>> {
        let section = self.load_section(ctx).await?;
        let conversation_id = section.conversation_id.ok_or(PipelineError::QuizNotGenerated {
            section_id: section.id,
        })?;

        let turn = self.tracker.turn(&conversation_id, Stage::Explanation).await?;
        Ok(parse_explanations(&turn.model))
    }

    /// 查看薄弱点（必须先作答）
    pub async fn view_topics(&self, ctx: &SectionCtx) -> AppResult<TopicList> {
        let section = self.load_section(ctx).await?;
        let conversation_id = match (section.answers_id, section.conversation_id) {
            (Some(_), Some(conversation_id)) => conversation_id,
            _ => {
                return Err(PipelineError::AnswersMissing {
                    section_id: section.id,
                }
                .into())
            }
        };

        self.topics_from(&conversation_id).await
    }

    async fn topics_from(&self, conversation_id: &str) -> AppResult<TopicList> {
        let turn = self
            .tracker
            .turn(conversation_id, Stage::TopicExtraction)
            .await?;
        Ok(parse_topics(&turn.model))
    }

    async fn load_section(&self, ctx: &SectionCtx) -> AppResult<Section> {
        self.store.find_section(&ctx.section_id, &ctx.user_id).await
    }
}
