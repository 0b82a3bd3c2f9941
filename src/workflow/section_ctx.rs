//! 学习单元处理上下文
//!
//! 封装"我正在处理哪个用户的哪个学习单元"这一信息

use std::fmt::Display;

/// 学习单元处理上下文
#[derive(Debug, Clone)]
pub struct SectionCtx {
    /// 学习单元ID
    pub section_id: String,

    /// 发起请求的用户（学习单元只对创建者可见）
    pub user_id: String,
}

impl SectionCtx {
    pub fn new(section_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            section_id: section_id.into(),
            user_id: user_id.into(),
        }
    }
}

impl Display for SectionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[单元 ID#{} 用户#{}]", self.section_id, self.user_id)
    }
}
