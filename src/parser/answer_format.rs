use crate::models::answer::Answer;

/// 把提交的答案格式化为提示词中使用的文本
///
/// 每个答案一行：`QuestionNumber : N, Answer :X`。格式是与提示词模板之间的约定。
pub fn format_answers(answers: &[Answer]) -> String {
    answers
        .iter()
        .map(|ans| format!("QuestionNumber : {}, Answer :{}\n", ans.question_no, ans.answer))
        .collect()
}
