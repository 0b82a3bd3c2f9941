//! 学习单元处理流程 - 流程层
//!
//! 核心职责：定义"一个学习单元"的完整处理流程
//!
//! 流程顺序：
//! 1. 提取文档文本 → 出题（第 0 轮）
//! 2. 批改 → 首次作答且未满分时生成解析（第 1 轮）
//! 3. 提取薄弱点（第 2 轮，只允许一次）
//!
//! 外部调用失败时流程中止，已完成的阶段保留。学习单元只做局部更新，状态只前进不后退。

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{Config, QuizVariant};
use crate::error::{AppResult, PipelineError};
use crate::models::{
    Answer, AnswerList, PdfDocument, QuestionAnswerExplanation, Quiz, Section, SectionState,
    Stage, TopicList,
};
use crate::parser::{parse_explanations, parse_questions, parse_topics};
use crate::services::{
    ConversationTracker, GradeResult, QuizScorer, TextExtractor, TextGenerator,
};
use crate::store::Store;
use crate::utils::logging::{log_quiz_summary, log_stage_start};
use crate::utils::truncate_text;
use crate::workflow::prompts;
use crate::workflow::section_ctx::SectionCtx;

/// 一次提交答案的结果
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub grade: GradeResult,
    /// 只有首次作答且未满分时才会生成
    pub explanations: Option<Vec<QuestionAnswerExplanation>>,
}

/// 学习单元处理流程
///
/// - 编排完整的学习单元处理流程
/// - 决定何时出题、何时解析、何时提取薄弱点
/// - 只依赖业务能力（services）与持久化接口（store）
pub struct SectionFlow {
    store: Arc<dyn Store>,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn TextGenerator>,
    tracker: ConversationTracker,
    scorer: QuizScorer,
    quiz_variant: QuizVariant,
}

impl SectionFlow {
    /// 创建新的学习单元处理流程
    pub fn new(
        config: &Config,
        store: Arc<dyn Store>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            tracker: ConversationTracker::new(store.clone()),
            scorer: QuizScorer::new(store.clone()),
            store,
            extractor,
            generator,
            quiz_variant: config.quiz_variant,
        }
    }

    /// 记录上传的文档并创建学习单元（状态：已创建）
    pub async fn create_section(
        &self,
        user_id: &str,
        section_name: &str,
        title: &str,
        file_link: &str,
    ) -> AppResult<Section> {
        let pdf_id = self.store.insert_pdf(PdfDocument::new(title, file_link)).await?;

        let mut section = Section::new(section_name, pdf_id, user_id);
        section.id = self.store.insert_section(section.clone()).await?;

        info!("📁 新建学习单元 {} ({})", section.id, section.section_name);
        Ok(section)
    }

    /// 已创建 → 已出题
    pub async fn generate_quiz(&self, ctx: &SectionCtx) -> AppResult<Quiz> {
        log_stage_start(&ctx.section_id, &Stage::QuizGeneration.to_string());

        let section = self.load_section(ctx).await?;
        if section.quiz_id.is_some() {
            return Err(PipelineError::QuizAlreadyGenerated {
                section_id: section.id,
            }
            .into());
        }

        let pdf = self.store.find_pdf(&section.pdf_id).await?;

        // 外部调用
        let text = self.extractor.extract_text(&pdf.file_link).await?;
        info!("{} 📄 文档文本: {}", ctx, truncate_text(&text, 60));

        let prompt = prompts::quiz_prompt(self.quiz_variant, &text);
        let response = self.generator.generate(&prompt).await?;

        // 解析
        let questions = parse_questions(&response);
        let expected = self.quiz_variant.question_count();
        if questions.len() != expected {
            warn!(
                "{} ⚠️ 解析出 {} 道题，提示词要求 {} 道",
                ctx,
                questions.len(),
                expected
            );
        }

        // 持久化
        let mut quiz = Quiz::new(questions, &ctx.user_id);
        quiz.id = self.store.insert_quiz(quiz.clone()).await?;

        let conversation_id = self.tracker.start().await?;
        self.tracker
            .append_turn(&conversation_id, Stage::QuizGeneration, prompt, response)
            .await?;

        if !self
            .store
            .attach_quiz(&section.id, &quiz.id, &conversation_id)
            .await?
        {
            warn!("{} ⚠️ 并发出题，本次生成的测验 {} 未被采用", ctx, quiz.id);
            return Err(PipelineError::QuizAlreadyGenerated {
                section_id: section.id,
            }
            .into());
        }

        log_quiz_summary(&ctx.section_id, quiz.questions.len(), expected);
        Ok(quiz)
    }

    /// 已出题 → 已批改 (→ 已解析)
    ///
    /// 同一测验只有第一次作答会生成解析；满分时不生成
    pub async fn submit_answers(
        &self,
        ctx: &SectionCtx,
        answers: Vec<Answer>,
    ) -> AppResult<SubmitOutcome> {
        log_stage_start(&ctx.section_id, "批改");

        let section = self.load_section(ctx).await?;
        let (quiz_id, conversation_id) = match (&section.quiz_id, &section.conversation_id) {
            (Some(quiz_id), Some(conversation_id)) => (quiz_id.clone(), conversation_id.clone()),
            _ => {
                return Err(PipelineError::QuizNotGenerated {
                    section_id: section.id,
                }
                .into())
            }
        };

        let grade = self.scorer.grade(&quiz_id, &answers).await?;
        self.store
            .advance_section(&section.id, SectionState::Graded, None)
            .await?;

        if grade.already_taken || grade.is_perfect() {
            info!(
                "{} 跳过解析: {}",
                ctx,
                if grade.already_taken { "重复作答" } else { "满分" }
            );
            return Ok(SubmitOutcome {
                grade,
                explanations: None,
            });
        }

        log_stage_start(&ctx.section_id, &Stage::Explanation.to_string());

        let turns = self.tracker.turns(&conversation_id).await?;
        let prompt = prompts::explanation_prompt(&grade.answers);
        let context = ConversationTracker::context_for(Stage::Explanation, &turns);
        let response = self
            .generator
            .generate(&prompts::build_prompt_with_context(&prompt, &context))
            .await?;

        let explanations = parse_explanations(&response);
        info!("{} ✅ 解析 {} 道题", ctx, explanations.len());

        // 持久化
        let answers_id = self
            .store
            .insert_answer_list(AnswerList::new(grade.answers.clone()))
            .await?;
        self.tracker
            .append_turn(&conversation_id, Stage::Explanation, prompt, response)
            .await?;

        self.store
            .advance_section(&section.id, SectionState::Explained, Some(answers_id))
            .await?;

        Ok(SubmitOutcome {
            grade,
            explanations: Some(explanations),
        })
    }

    /// 已解析 → 已提取薄弱点（每个对话只允许一次）
    pub async fn extract_topics(&self, ctx: &SectionCtx) -> AppResult<TopicList> {
        log_stage_start(&ctx.section_id, &Stage::TopicExtraction.to_string());

        let section = self.load_section(ctx).await?;
        let (answers_id, conversation_id) = match (&section.answers_id, &section.conversation_id)
        {
            (Some(answers_id), Some(conversation_id)) => {
                (answers_id.clone(), conversation_id.clone())
            }
            _ => {
                return Err(PipelineError::AnswersMissing {
                    section_id: section.id,
                }
                .into())
            }
        };

        let turns = self.tracker.turns(&conversation_id).await?;
        if turns.len() >= 3 {
            return Err(PipelineError::TopicsAlreadyExtracted {
                section_id: section.id,
                turns: turns.len(),
            }
            .into());
        }

        let answer_list = self.store.find_answer_list(&answers_id).await?;
        let prompt = prompts::topic_prompt(&answer_list.answers);
        let context = ConversationTracker::context_for(Stage::TopicExtraction, &turns);
        let response = self
            .generator
            .generate(&prompts::build_prompt_with_context(&prompt, &context))
            .await?;

        let topics = parse_topics(&response);
        info!("{} ✅ 提取薄弱点 {} 个", ctx, topics.len());

        // 持久化
        self.tracker
            .append_turn(&conversation_id, Stage::TopicExtraction, prompt, response)
            .await?;

        self.store
            .advance_section(&section.id, SectionState::TopicsExtracted, None)
            .await?;

        Ok(topics)
    }

    async fn load_section(&self, ctx: &SectionCtx) -> AppResult<Section> {
        self.store.find_section(&ctx.section_id, &ctx.user_id).await
    }
}
