use serde::{Deserialize, Serialize};

/// 用户对单道题的作答
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// 题号（从 1 开始；0 表示未提供，按位置对应）
    pub question_no: u32,
    pub answer: String,
}

impl Answer {
    pub fn new(question_no: u32, answer: impl Into<String>) -> Self {
        Self {
            question_no,
            answer: answer.into(),
        }
    }
}

/// 一次批改提交的全部答案，原样保存
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerList {
    #[serde(default)]
    pub id: String,
    pub answers: Vec<Answer>,
}

impl AnswerList {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            id: String::new(),
            answers,
        }
    }
}

/// 每道题的批改解析（从解析轮次的模型回复中得到）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswerExplanation {
    pub question_number: u32,
    pub correct_answer: String,
    pub your_answer: String,
    pub correctness: bool,
    pub explanation: String,
}
