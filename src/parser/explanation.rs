use crate::models::answer::QuestionAnswerExplanation;

use super::{first_number, strip_decoration};

/// 解析行中可识别的字段名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    QuestionNumber,
    CorrectAnswer,
    YourAnswer,
    Correctness,
    Explanation,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        let key = strip_decoration(key);
        [
            ("Question Number", Field::QuestionNumber),
            ("Correct Answer", Field::CorrectAnswer),
            ("Your Answer", Field::YourAnswer),
            ("Correctness", Field::Correctness),
            ("Explanation", Field::Explanation),
        ]
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, field)| field)
    }
}

/// 解析答案解析轮次的模型回复
///
/// 每行按第一个冒号前的字段名分类。`Question Number` 开始一条新记录（先提交
/// 正在累积的记录），其余字段写入当前记录；未知字段与标题前的行被忽略。
/// 题号为 0（缺失或无法解析）的记录不会输出。
pub fn parse_explanations(input: &str) -> Vec<QuestionAnswerExplanation> {
    let mut records = Vec::new();
    let mut current: Option<QuestionAnswerExplanation> = None;

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let Some(field) = Field::from_key(key) else {
            continue;
        };
        let value = value.trim().trim_matches('*').trim();

        if field == Field::QuestionNumber {
            if let Some(finished) = current.take() {
                flush(&mut records, finished);
            }
            current = Some(QuestionAnswerExplanation {
                question_number: first_number(value).unwrap_or(0),
                ..Default::default()
            });
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };
        match field {
            Field::CorrectAnswer => record.correct_answer = value.to_string(),
            Field::YourAnswer => record.your_answer = value.to_string(),
            Field::Correctness => record.correctness = value == "Correct",
            Field::Explanation => record.explanation = value.to_string(),
            Field::QuestionNumber => {}
        }
    }

    if let Some(finished) = current {
        flush(&mut records, finished);
    }

    records
}

fn flush(records: &mut Vec<QuestionAnswerExplanation>, record: QuestionAnswerExplanation) {
    if record.question_number != 0 {
        records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BLOCKS: &str = r#"
Question Number: 1
Correct Answer: B
Your Answer: A
Correctness: Incorrect
Explanation: Paris is the capital of France.

Question Number: 2
Correct Answer: C
Your Answer: C
Correctness: Correct
Explanation: Mount Everest is the highest mountain: 8849 m.
"#;

    #[test]
    fn test_parse_two_blocks() {
        let result = parse_explanations(TWO_BLOCKS);

        assert_eq!(result.len(), 2);
        assert_eq!(
            result[0],
            QuestionAnswerExplanation {
                question_number: 1,
                correct_answer: "B".to_string(),
                your_answer: "A".to_string(),
                correctness: false,
                explanation: "Paris is the capital of France.".to_string(),
            }
        );
        assert!(result[1].correctness);
        // 只按第一个冒号切分，解析内容中的冒号保留
        assert_eq!(
            result[1].explanation,
            "Mount Everest is the highest mountain: 8849 m."
        );
    }

    #[test]
    fn test_correctness_requires_exact_value() {
        let input = "Question Number: 1\nCorrectness: correct\nQuestion Number: 2\nCorrectness: Correct!\nQuestion Number: 3\nCorrectness: Correct\n";
        let result = parse_explanations(input);

        let flags: Vec<bool> = result.iter().map(|r| r.correctness).collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn test_markdown_keys_are_recognized() {
        let input = "**Question Number:** 4\n**Correct Answer:** D\n- Your Answer: B\n**Correctness:** Incorrect\n";
        let result = parse_explanations(input);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].question_number, 4);
        assert_eq!(result[0].correct_answer, "D");
        assert_eq!(result[0].your_answer, "B");
    }

    #[test]
    fn test_unknown_keys_and_preamble_are_ignored() {
        let input = "Here is your review:\nCorrect Answer: Z\nQuestion Number: 1\nScore: 3/10\nExplanation: fine\n";
        let result = parse_explanations(input);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].correct_answer, "");
        assert_eq!(result[0].explanation, "fine");
    }

    #[test]
    fn test_zero_question_number_is_dropped() {
        let input = "Question Number: unknown\nCorrect Answer: A\n";
        assert!(parse_explanations(input).is_empty());
        assert!(parse_explanations("").is_empty());
    }
}
