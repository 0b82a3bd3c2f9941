use serde::{Deserialize, Serialize};
use std::fmt;

/// 对话阶段
///
/// 阶段与轮次位置一一对应：出题 = 第 0 轮，解析 = 第 1 轮，薄弱点 = 第 2 轮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    QuizGeneration,
    Explanation,
    TopicExtraction,
}

impl Stage {
    /// 该阶段在对话中的轮次位置
    pub fn index(self) -> usize {
        match self {
            Stage::QuizGeneration => 0,
            Stage::Explanation => 1,
            Stage::TopicExtraction => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Stage::QuizGeneration),
            1 => Some(Stage::Explanation),
            2 => Some(Stage::TopicExtraction),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::QuizGeneration => "出题",
            Stage::Explanation => "答案解析",
            Stage::TopicExtraction => "薄弱点提取",
        };
        f.write_str(name)
    }
}

/// 一次与模型的问答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub stage: Stage,
    pub user: String,
    pub model: String,
}

impl ConversationTurn {
    pub fn new(stage: Stage, user: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            stage,
            user: user.into(),
            model: model.into(),
        }
    }
}

/// 对话（只追加）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(default)]
    pub id: String,
    pub turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按阶段查找轮次
    pub fn turn(&self, stage: Stage) -> Option<&ConversationTurn> {
        self.turns.iter().find(|turn| turn.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
