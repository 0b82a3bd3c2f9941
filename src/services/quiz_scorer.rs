//! 测验评分 - 业务能力层

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppResult, PipelineError};
use crate::models::{Answer, Question};
use crate::store::Store;

/// 一次批改的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeResult {
    pub score: usize,
    pub max_score: usize,
    /// 本次批改之前测验是否已经被批改过
    pub already_taken: bool,
    /// 补全题号后的答案（题号为 0 的答案换成对应位置题目的题号）
    pub answers: Vec<Answer>,
}

impl GradeResult {
    pub fn is_perfect(&self) -> bool {
        self.score == self.max_score
    }
}

/// 测验评分服务
#[derive(Clone)]
pub struct QuizScorer {
    store: Arc<dyn Store>,
}

impl QuizScorer {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// 批改答案
    ///
    /// 每道题必须恰好有一个答案。提交无效时测验保持未作答状态。
    /// 第一次批改会把测验标记为已完成，返回的 `already_taken` 是标记之前的值。
    pub async fn grade(&self, quiz_id: &str, answers: &[Answer]) -> AppResult<GradeResult> {
        let quiz = self.store.find_quiz(quiz_id).await?;

        let answers = normalize_answers(&quiz.questions, answers)?;
        let score = score_answers(&quiz.questions, &answers);
        let already_taken = self.store.mark_quiz_taken(quiz_id).await?;

        info!(
            "📝 测验 {} 批改完成: {}/{}{}",
            quiz_id,
            score,
            quiz.max_score(),
            if already_taken { " (重复作答)" } else { "" }
        );

        Ok(GradeResult {
            score,
            max_score: quiz.max_score(),
            already_taken,
            answers,
        })
    }
}

/// 校验并补全答案题号
///
/// 题号为 0 的答案取同一位置题目的题号。补全后每道题必须恰好对应一个答案。
pub fn normalize_answers(questions: &[Question], answers: &[Answer]) -> AppResult<Vec<Answer>> {
    if answers.len() != questions.len() {
        return Err(PipelineError::AnswerCountMismatch {
            expected: questions.len(),
            actual: answers.len(),
        }
        .into());
    }

    let normalized: Vec<Answer> = answers
        .iter()
        .zip(questions)
        .map(|(answer, question)| {
            let question_no = if answer.question_no == 0 {
                question.number
            } else {
                answer.question_no
            };
            Answer::new(question_no, answer.answer.clone())
        })
        .collect();

    let mut seen = HashSet::new();
    for answer in &normalized {
        if !questions.iter().any(|q| q.number == answer.question_no) {
            return Err(PipelineError::UnknownQuestion {
                question_no: answer.question_no,
            }
            .into());
        }
        if !seen.insert(answer.question_no) {
            return Err(PipelineError::DuplicateAnswer {
                question_no: answer.question_no,
            }
            .into());
        }
    }

    Ok(normalized)
}

/// 计算得分（答案已按题号补全）
pub fn score_answers(questions: &[Question], answers: &[Answer]) -> usize {
    answers
        .iter()
        .filter(|answer| {
            match questions.iter().find(|q| q.number == answer.question_no) {
                Some(question) => question.is_correct(&answer.answer),
                None => {
                    debug!("答案找不到对应题目: 题号 {}", answer.question_no);
                    false
                }
            }
        })
        .count()
}
