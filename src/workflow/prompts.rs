//! 提示词模板
//!
//! 模板与 `crate::parser` 中的解析器成对维护：这里要求模型输出的格式，
//! 就是解析器能识别的格式。

use crate::config::QuizVariant;
use crate::models::{Answer, ConversationTurn, Question};
use crate::parser::{format_answers, render_quiz};

/// 出题提示词中的示例题目
fn example_questions() -> Vec<Question> {
    vec![
        Question {
            number: 1,
            question: "What is the capital of France?".to_string(),
            a: "London".to_string(),
            b: "Paris".to_string(),
            c: "Rome".to_string(),
            d: "Berlin".to_string(),
            answer: "B".to_string(),
        },
        Question {
            number: 2,
            question: "What is the highest mountain in the world?".to_string(),
            a: "K2".to_string(),
            b: "Kangchenjunga".to_string(),
            c: "Mount Everest".to_string(),
            d: "Lhotse".to_string(),
            answer: "C".to_string(),
        },
    ]
}

/// 出题提示词
pub fn quiz_prompt(variant: QuizVariant, text: &str) -> String {
    format!(
        "Generate {count} multiple-choice questions based on the following text. \
Each question should have 4 alternatives (A, B, C, D) and indicate the correct answer. \
Format the output precisely as shown in the example below. \
Do not include any extra text or explanations.\n\n\
Example Format:\n{example}\n\nText:\n{text}\n",
        count = variant.question_count(),
        example = render_quiz(&example_questions()),
        text = text,
    )
}

/// 答案解析提示词（上下文为此前全部轮次）
pub fn explanation_prompt(answers: &[Answer]) -> String {
    format!(
        "Here are my answers to the quiz above:\n{answers}\n\
For every question, compare my answer with the correct answer and explain it. \
Use exactly this format for each question and nothing else:\n\n\
Question Number: 1\n\
Correct Answer: B\n\
Your Answer: C\n\
Correctness: Incorrect\n\
Explanation: why the correct answer is right\n\n\
Write Correctness as either Correct or Incorrect.\n",
        answers = format_answers(answers),
    )
}

/// 薄弱点提示词（上下文只有出题轮）
pub fn topic_prompt(answers: &[Answer]) -> String {
    format!(
        "Here are my answers to the quiz above:\n{answers}\n\
Based on the questions I got wrong, list the topics I should study again. \
Use exactly this format for each topic and nothing else:\n\n\
Weak Point 1: topic title\n\
Explanation: what to review and why\n",
        answers = format_answers(answers),
    )
}

/// 把历史轮次拼进当前请求
pub fn build_prompt_with_context(prompt: &str, history: &[ConversationTurn]) -> String {
    let mut full = String::from("Previous conversation:\n");
    for turn in history {
        full.push_str(&format!("User: {}\nModel: {}\n", turn.user, turn.model));
    }
    full.push_str(&format!("\nCurrent request:\n{}", prompt));
    full
}
