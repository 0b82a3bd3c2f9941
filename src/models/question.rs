use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 选项标签
pub const OPTION_LABELS: [&str; 4] = ["A", "B", "C", "D"];

/// 单道选择题
///
/// `number` 是题目在所属测验中的编号（从 1 开始），用于与提交的答案对应
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub number: u32,
    pub question: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub answer: String,
}

impl Question {
    /// 按标签取选项内容
    pub fn option(&self, label: &str) -> Option<&str> {
        match label {
            "A" => Some(&self.a),
            "B" => Some(&self.b),
            "C" => Some(&self.c),
            "D" => Some(&self.d),
            _ => None,
        }
    }

    /// 按标签设置选项内容，未知标签返回 false
    pub fn set_option(&mut self, label: &str, text: impl Into<String>) -> bool {
        let slot = match label {
            "A" => &mut self.a,
            "B" => &mut self.b,
            "C" => &mut self.c,
            "D" => &mut self.d,
            _ => return false,
        };
        *slot = text.into();
        true
    }

    /// 判断提交的标签是否正确（忽略首尾空白与大小写）
    pub fn is_correct(&self, submitted: &str) -> bool {
        let expected = self.answer.trim();
        !expected.is_empty() && expected.eq_ignore_ascii_case(submitted.trim())
    }
}

/// 测验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub id: String,
    /// 是否已经批改过（第一次批改后置为 true，之后不再改变）
    pub taken: bool,
    pub questions: Vec<Question>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, created_by: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            taken: false,
            questions,
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }

    /// 满分（题目数量）
    pub fn max_score(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_option() {
        let mut q = Question::default();
        assert!(q.set_option("C", "第三项"));
        assert!(!q.set_option("E", "不存在"));
        assert_eq!(q.option("C"), Some("第三项"));
        assert_eq!(q.option("E"), None);
    }

    #[test]
    fn test_is_correct_ignores_case_and_whitespace() {
        let q = Question {
            answer: "B".to_string(),
            ..Default::default()
        };
        assert!(q.is_correct(" b "));
        assert!(!q.is_correct("A"));

        // 没有正确答案的题目永远不得分
        let empty = Question::default();
        assert!(!empty.is_correct(""));
    }
}
