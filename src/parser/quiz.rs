use crate::models::question::{Question, OPTION_LABELS};
use tracing::debug;

use super::first_number;

/// 单行的分类
enum QuizLine<'a> {
    /// `A, 选项内容`
    Option { label: &'a str, text: &'a str },
    /// `1, 题干`
    Header { number: Option<u32>, prompt: &'a str },
    /// 不含逗号的行：正确答案
    AnswerLabel(&'a str),
}

fn classify(line: &str) -> QuizLine<'_> {
    match line.split_once(',') {
        Some((prefix, rest)) => {
            let prefix = prefix.trim();
            if OPTION_LABELS.iter().any(|label| *label == prefix) {
                QuizLine::Option {
                    label: prefix,
                    text: rest.trim(),
                }
            } else {
                QuizLine::Header {
                    number: first_number(prefix),
                    prompt: rest.trim(),
                }
            }
        }
        None => QuizLine::AnswerLabel(line),
    }
}

enum State {
    AwaitingHeader,
    Accumulating(Question),
}

/// 解析出题轮次的模型回复
///
/// 每遇到一个题干行就新建一条记录；不含逗号的行是正确答案，设置后提交该题。
/// 没有题号的题干按出现顺序编号。
pub fn parse_questions(input: &str) -> Vec<Question> {
    let mut questions: Vec<Question> = Vec::new();
    let mut state = State::AwaitingHeader;

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        state = match (state, classify(line)) {
            (State::Accumulating(unfinished), QuizLine::Header { number, prompt }) => {
                debug!("题目 {} 没有答案行，已丢弃", unfinished.number);
                State::Accumulating(new_question(number, prompt, questions.len()))
            }
            (State::AwaitingHeader, QuizLine::Header { number, prompt }) => {
                State::Accumulating(new_question(number, prompt, questions.len()))
            }
            (State::Accumulating(mut question), QuizLine::Option { label, text }) => {
                question.set_option(label, text);
                State::Accumulating(question)
            }
            (State::Accumulating(mut question), QuizLine::AnswerLabel(label)) => {
                question.answer = label.to_string();
                questions.push(question);
                State::AwaitingHeader
            }
            (State::AwaitingHeader, _) => State::AwaitingHeader,
        };
    }

    if let State::Accumulating(unfinished) = state {
        debug!("末尾题目 {} 没有答案行，已丢弃", unfinished.number);
    }

    questions
}

fn new_question(number: Option<u32>, prompt: &str, parsed: usize) -> Question {
    Question {
        number: number.unwrap_or(parsed as u32 + 1),
        question: prompt.to_string(),
        ..Default::default()
    }
}

/// 按出题提示词中的示例格式输出一道题（`parse_questions` 的逆操作）
pub fn render_question(question: &Question) -> String {
    format!(
        "{}, {}\nA, {}\nB, {}\nC, {}\nD, {}\n{}\n",
        question.number,
        question.question,
        question.a,
        question.b,
        question.c,
        question.d,
        question.answer
    )
}

/// 输出整份测验，题目之间空一行
pub fn render_quiz(questions: &[Question]) -> String {
    questions
        .iter()
        .map(render_question)
        .collect::<Vec<_>>()
        .join("\n")
}
