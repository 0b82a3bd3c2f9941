//! 对话记录 - 业务能力层
//!
//! 每个学习单元一条只追加的对话：第 0 轮出题、第 1 轮解析、第 2 轮薄弱点。
//! 对话既是持久化记录，也是回传给模型的上下文。

use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, AppResult, PipelineError, StoreError};
use crate::models::{Conversation, ConversationTurn, Stage};
use crate::store::Store;

/// 对话记录服务
#[derive(Clone)]
pub struct ConversationTracker {
    store: Arc<dyn Store>,
}

impl ConversationTracker {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// 新建空对话，返回标识符
    pub async fn start(&self) -> AppResult<String> {
        self.store.insert_conversation(Conversation::new()).await
    }

    /// 追加一轮问答
    ///
    /// 轮次位置由阶段决定，只有前面的阶段都已存在时才允许追加。
    /// 返回追加后的轮数。
    pub async fn append_turn(
        &self,
        conversation_id: &str,
        stage: Stage,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> AppResult<usize> {
        let turn = ConversationTurn::new(stage, prompt, response);
        match self
            .store
            .append_turn(conversation_id, stage.index(), turn)
            .await
        {
            Ok(len) => {
                debug!("对话 {} 追加 {} 轮，当前 {} 轮", conversation_id, stage, len);
                Ok(len)
            }
            Err(AppError::Store(StoreError::AppendConflict {
                expected, actual, ..
            })) => Err(PipelineError::StageOutOfOrder {
                stage: stage.to_string(),
                expected,
                actual,
            }
            .into()),
            Err(e) => Err(e),
        }
    }

    /// 按顺序返回全部轮次
    pub async fn turns(&self, conversation_id: &str) -> AppResult<Vec<ConversationTurn>> {
        Ok(self.store.find_conversation(conversation_id).await?.turns)
    }

    /// 取出指定阶段的轮次
    pub async fn turn(&self, conversation_id: &str, stage: Stage) -> AppResult<ConversationTurn> {
        let conversation = self.store.find_conversation(conversation_id).await?;
        conversation
            .turn(stage)
            .cloned()
            .ok_or_else(|| {
                PipelineError::StageMissing {
                    stage: stage.to_string(),
                }
                .into()
            })
    }

    /// 某阶段可用的上下文轮次
    ///
    /// - 出题：无上下文
    /// - 解析：之前的全部轮次
    /// - 薄弱点：只用出题轮
    pub fn context_for(stage: Stage, turns: &[ConversationTurn]) -> Vec<ConversationTurn> {
        match stage {
            Stage::QuizGeneration => Vec::new(),
            Stage::Explanation => turns.to_vec(),
            Stage::TopicExtraction => turns
                .iter()
                .filter(|turn| turn.stage == Stage::QuizGeneration)
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn tracker() -> ConversationTracker {
        ConversationTracker::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_turns_are_appended_in_stage_order() {
        let tracker = tracker();
        let id = tracker.start().await.unwrap();

        assert_eq!(
            tracker
                .append_turn(&id, Stage::QuizGeneration, "出题提示", "1, Q?")
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            tracker
                .append_turn(&id, Stage::Explanation, "解析提示", "Question Number: 1")
                .await
                .unwrap(),
            2
        );

        let turns = tracker.turns(&id).await.unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].stage, Stage::QuizGeneration);
        assert_eq!(turns[1].user, "解析提示");
    }

    #[tokio::test]
    async fn test_out_of_order_stage_is_rejected() {
        let tracker = tracker();
        let id = tracker.start().await.unwrap();

        let err = tracker
            .append_turn(&id, Stage::Explanation, "解析提示", "回复")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Pipeline(PipelineError::StageOutOfOrder {
                expected: 1,
                actual: 0,
                ..
            })
        ));
        assert!(tracker.turns(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_stage_is_rejected() {
        let tracker = tracker();
        let id = tracker.start().await.unwrap();
        tracker
            .append_turn(&id, Stage::QuizGeneration, "p", "r")
            .await
            .unwrap();

        assert!(tracker
            .append_turn(&id, Stage::QuizGeneration, "p", "r")
            .await
            .is_err());
        assert_eq!(tracker.turns(&id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_stage_lookup() {
        let tracker = tracker();
        let id = tracker.start().await.unwrap();

        let err = tracker.turn(&id, Stage::Explanation).await.unwrap_err();
        assert!(matches!(err, AppError::Pipeline(PipelineError::StageMissing { .. })));
    }

    #[test]
    fn test_context_rules() {
        let turns = vec![
            ConversationTurn::new(Stage::QuizGeneration, "q", "quiz"),
            ConversationTurn::new(Stage::Explanation, "e", "explain"),
        ];

        assert!(ConversationTracker::context_for(Stage::QuizGeneration, &turns).is_empty());
        assert_eq!(
            ConversationTracker::context_for(Stage::Explanation, &turns).len(),
            2
        );

        let topic_context = ConversationTracker::context_for(Stage::TopicExtraction, &turns);
        assert_eq!(topic_context.len(), 1);
        assert_eq!(topic_context[0].model, "quiz");
    }
}
