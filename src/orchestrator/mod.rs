//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责组装服务与对外提供操作，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 持有存储和外部服务实例
//! - 命令行模式下为配置中的文档出题
//!
//! ### `views` - 查看接口
//! - 学习单元列表与详情
//! - 测验、答案解析、薄弱点的只读查看
//! - 解析结果每次从对话记录重新解析
//!
//! ## 层次关系
//!
//! ```text
//! app / views
//!     ↓
//! workflow::SectionFlow (处理单个学习单元)
//!     ↓
//! services (能力层：文本提取 / 文本生成 / 对话记录 / 评分)
//!     ↓
//! store (持久化接口)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → workflow → services → store
//! 2. **无业务逻辑**：只做组装和查看，状态转换都在 workflow 中

pub mod app;
pub mod views;

// 重新导出主要类型
pub use app::App;
pub use views::{SectionDetail, SectionViews};
