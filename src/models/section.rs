use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 学习单元的流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    Created,
    QuizGenerated,
    Graded,
    Explained,
    TopicsExtracted,
}

impl fmt::Display for SectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionState::Created => "已创建",
            SectionState::QuizGenerated => "已出题",
            SectionState::Graded => "已批改",
            SectionState::Explained => "已解析",
            SectionState::TopicsExtracted => "已提取薄弱点",
        };
        f.write_str(name)
    }
}

/// 学习单元：一份文档与它的测验、对话、答案记录
///
/// 其他聚合只通过标识符引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: String,
    pub section_name: String,
    pub pdf_id: String,
    pub quiz_id: Option<String>,
    pub conversation_id: Option<String>,
    /// 第一次批改产生解析后才会设置
    pub answers_id: Option<String>,
    pub state: SectionState,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Section {
    pub fn new(
        section_name: impl Into<String>,
        pdf_id: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            section_name: section_name.into(),
            pdf_id: pdf_id.into(),
            quiz_id: None,
            conversation_id: None,
            answers_id: None,
            state: SectionState::Created,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }
}
