use crate::models::topic::{Topic, TopicList};

const WEAK_POINT: &str = "Weak Point";
const EXPLANATION: &str = "Explanation";

/// 模板格式 `Weak Point : 标题` / `Explanation: 内容` 中内容开始的位置
const FIELD_OFFSET: usize = 13;

/// 解析薄弱点轮次的模型回复
///
/// `Weak Point` 行开始一个新的薄弱点（先提交标题非空的上一个），
/// `Explanation` 行设置解释，其他非空行作为续行追加到当前解释。
/// 第一个 `Weak Point` 之前的内容被忽略。
pub fn parse_topics(input: &str) -> TopicList {
    let mut topics = Vec::new();
    let mut current: Option<Topic> = None;

    for raw in input.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(WEAK_POINT) {
            if let Some(finished) = current.take() {
                flush(&mut topics, finished);
            }
            current = Some(Topic {
                title: field_value(line, WEAK_POINT),
                explanation: String::new(),
            });
        } else if let Some(topic) = current.as_mut() {
            if line.starts_with(EXPLANATION) {
                topic.explanation = field_value(line, EXPLANATION);
            } else {
                if !topic.explanation.is_empty() {
                    topic.explanation.push(' ');
                }
                topic.explanation.push_str(line);
            }
        }
    }

    if let Some(finished) = current {
        flush(&mut topics, finished);
    }

    TopicList { topics }
}

fn flush(topics: &mut Vec<Topic>, topic: Topic) {
    if !topic.title.is_empty() {
        topics.push(topic);
    }
}

/// 取字段内容：优先取关键字后第一个冒号之后的文本，没有冒号时使用固定偏移
fn field_value(line: &str, keyword: &str) -> String {
    let rest = &line[keyword.len()..];
    let value = match rest.split_once(':') {
        Some((_, value)) => value.to_string(),
        None => line.chars().skip(FIELD_OFFSET).collect(),
    };
    value.trim().trim_matches('*').trim().to_string()
}
