//! 模型回复解析
//!
//! 把模型返回的纯文本转换为结构化记录。每个解析器都是逐行扫描的小状态机
//! （等待标题 / 累积字段），只有一个"提交当前记录"的转换。
//!
//! 解析从不报错：格式不对的内容只会得到空字段或被忽略，调用方需要容忍
//! 不完整的记录。提示词模板（`workflow::prompts`）与这里的格式必须同步修改。

pub mod answer_format;
pub mod explanation;
pub mod quiz;
pub mod topic;

pub use answer_format::format_answers;
pub use explanation::parse_explanations;
pub use quiz::{parse_questions, render_question, render_quiz};
pub use topic::parse_topics;

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("数字正则无效"));

/// 提取文本中的第一个整数，如 "1"、"#3"、"Question 12." 都能识别
pub(crate) fn first_number(text: &str) -> Option<u32> {
    NUMBER.find(text).and_then(|m| m.as_str().parse().ok())
}

/// 去掉 Markdown 加粗、列表符号等修饰
pub(crate) fn strip_decoration(text: &str) -> &str {
    text.trim()
        .trim_matches(|c: char| c == '*' || c == '_' || c == '#' || c == '-' || c == '`')
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("1"), Some(1));
        assert_eq!(first_number(" #12."), Some(12));
        assert_eq!(first_number("Question"), None);
    }

    #[test]
    fn test_strip_decoration() {
        assert_eq!(strip_decoration("**Correctness**"), "Correctness");
        assert_eq!(strip_decoration("- Explanation"), "Explanation");
        assert_eq!(strip_decoration("plain"), "plain");
    }
}
