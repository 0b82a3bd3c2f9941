use chrono::Utc;
use serde::{Deserialize, Serialize};

/// 上传的 PDF 文档记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfDocument {
    #[serde(default)]
    pub id: String,
    /// 原始文件名
    pub title: String,
    /// 文件存储链接（文本提取 API 的输入）
    pub file_link: String,
    /// RFC 3339 格式的创建时间
    pub created: String,
}

impl PdfDocument {
    pub fn new(title: impl Into<String>, file_link: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            title: title.into(),
            file_link: file_link.into(),
            created: Utc::now().to_rfc3339(),
        }
    }
}
