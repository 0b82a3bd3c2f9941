/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `model`: LLM 模型名称
/// - `question_count`: 每次出题数量
pub fn log_startup(model: &str, question_count: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 学习助手流程");
    info!("🤖 LLM 模型: {}", model);
    info!("📋 每份文档出题数量: {}", question_count);
    info!("{}", "=".repeat(60));
}

/// 记录流程阶段开始
///
/// # 参数
/// - `section_id`: 学习单元 ID
/// - `stage`: 阶段名称
pub fn log_stage_start(section_id: &str, stage: &str) {
    info!("\n[单元 {}] {}", section_id, "─".repeat(30));
    info!("[单元 {}] ▶ 开始阶段: {}", section_id, stage);
}

/// 打印测验生成结果
///
/// # 参数
/// - `section_id`: 学习单元 ID
/// - `question_count`: 解析出的题目数量
/// - `expected`: 提示词要求的题目数量
pub fn log_quiz_summary(section_id: &str, question_count: usize, expected: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 测验生成完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("单元: {}", section_id);
    info!("✅ 解析题目: {}/{}", question_count, expected);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("abcdef", 3), "abc...");
        assert_eq!(truncate_text("题目内容很长", 2), "题目...");
    }
}
