//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建存储、文档服务、LLM 服务，组装流程
//! 2. **资源管理**：唯一持有各个服务实例的地方
//! 3. **命令行运行**：为配置中的文档创建学习单元并出题，输出统计

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppResult;
use crate::orchestrator::views::SectionViews;
use crate::services::{DocumentService, LlmService, TextExtractor, TextGenerator};
use crate::store::{MemoryStore, Store};
use crate::utils::logging::log_startup;
use crate::utils::truncate_text;
use crate::workflow::{SectionCtx, SectionFlow};

/// 应用主结构
pub struct App {
    config: Config,
    flow: SectionFlow,
    views: SectionViews,
}

impl App {
    /// 使用真实的外部服务初始化应用
    pub async fn initialize(config: Config) -> AppResult<Self> {
        log_startup(&config.llm_model_name, config.quiz_variant.question_count());

        if config.llm_api_key.is_empty() {
            warn!("⚠️ 未设置 LLM_API_KEY");
        }
        if config.pdfco_api_key.is_empty() {
            warn!("⚠️ 未设置 PDFCO_API_KEY");
        }

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let extractor: Arc<dyn TextExtractor> = Arc::new(DocumentService::new(&config));
        let generator: Arc<dyn TextGenerator> = Arc::new(LlmService::new(&config));

        Ok(Self::with_services(config, store, extractor, generator))
    }

    /// 使用指定的服务组装应用
    pub fn with_services(
        config: Config,
        store: Arc<dyn Store>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let flow = SectionFlow::new(&config, store.clone(), extractor, generator);
        let views = SectionViews::new(store);
        Self {
            config,
            flow,
            views,
        }
    }

    pub fn flow(&self) -> &SectionFlow {
        &self.flow
    }

    pub fn views(&self) -> &SectionViews {
        &self.views
    }

    /// 运行应用主逻辑：为配置中的文档出题
    pub async fn run(&self) -> AppResult<()> {
        let Some(link) = self.config.source_document_link.as_deref() else {
            warn!("⚠️ 没有设置 SOURCE_DOCUMENT_LINK，程序结束");
            return Ok(());
        };

        let user_id = &self.config.source_user_id;
        let title = link.rsplit('/').next().unwrap_or(link);

        let section = self.flow.create_section(user_id, title, title, link).await?;
        let ctx = SectionCtx::new(&section.id, user_id);
        let quiz = self.flow.generate_quiz(&ctx).await?;

        for question in &quiz.questions {
            info!(
                "{}. {}  (答案: {})",
                question.number,
                truncate_text(&question.question, 80),
                question.answer
            );
        }

        let sections = self.views.section_list(user_id).await?;
        info!("📚 用户 {} 共有 {} 个学习单元", user_id, sections.len());

        Ok(())
    }
}
