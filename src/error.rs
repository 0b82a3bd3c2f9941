use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档文本提取 API 错误
    #[error("文档API错误: {0}")]
    Api(#[from] ApiError),
    /// LLM 服务错误
    #[error("LLM错误: {0}")]
    Llm(#[from] LlmError),
    /// 持久化错误
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    /// 流程状态错误
    #[error("流程错误: {0}")]
    Pipeline(#[from] PipelineError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 文档 API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status:?}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: Option<u16>,
        message: Option<String>,
    },
    /// API 返回结果中缺少字段
    #[error("API返回结果缺少字段 {field}: {endpoint}")]
    MissingField { endpoint: String, field: String },
    /// 调用超时
    #[error("API调用超时 ({endpoint}), 超时时间: {seconds}秒")]
    Timeout { endpoint: String, seconds: u64 },
    /// JSON 解析失败
    #[error("JSON解析失败: {0}")]
    JsonParseFailed(#[from] serde_json::Error),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("LLM API调用失败 (模型: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 调用超时
    #[error("LLM调用超时 (模型: {model}), 超时时间: {seconds}秒")]
    Timeout { model: String, seconds: u64 },
}

/// 持久化错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 标识符格式错误
    #[error("无效的{kind}标识符: {id}")]
    InvalidId { kind: &'static str, id: String },
    /// 记录不存在
    #[error("{kind}不存在: {id}")]
    NotFound { kind: &'static str, id: String },
    /// 对话追加冲突（期望的轮次与实际不一致）
    #[error("对话 {id} 追加冲突: 期望第 {expected} 轮, 实际已有 {actual} 轮")]
    AppendConflict {
        id: String,
        expected: usize,
        actual: usize,
    },
}

/// 流程状态错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 测验已生成
    #[error("测验已生成 (section: {section_id})")]
    QuizAlreadyGenerated { section_id: String },
    /// 测验尚未生成
    #[error("测验尚未生成 (section: {section_id})")]
    QuizNotGenerated { section_id: String },
    /// 答案数量与题目数量不一致
    #[error("答案数量不匹配: 期望 {expected}, 实际 {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },
    /// 同一道题提交了多个答案
    #[error("第 {question_no} 题提交了多个答案")]
    DuplicateAnswer { question_no: u32 },
    /// 答案的题号在测验中不存在
    #[error("测验中没有第 {question_no} 题")]
    UnknownQuestion { question_no: u32 },
    /// 尚未提交答案（没有解析记录）
    #[error("请先完成测验再生成薄弱点 (section: {section_id})")]
    AnswersMissing { section_id: String },
    /// 薄弱点已提取
    #[error("薄弱点已提取, 对话已有 {turns} 轮 (section: {section_id})")]
    TopicsAlreadyExtracted { section_id: String, turns: usize },
    /// 对话轮次顺序错误
    #[error("对话阶段 {stage} 只能作为第 {expected} 轮追加, 当前已有 {actual} 轮")]
    StageOutOfOrder {
        stage: String,
        expected: usize,
        actual: usize,
    },
    /// 对话中缺少指定阶段
    #[error("对话中没有 {stage} 阶段的记录")]
    StageMissing { stage: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Api(ApiError::JsonParseFailed(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 创建记录不存在错误
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        AppError::Store(StoreError::NotFound {
            kind,
            id: id.into(),
        })
    }

    /// 是否是调用方可见的错误（无效标识符 / 不存在 / 状态不允许）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::Store(StoreError::InvalidId { .. })
                | AppError::Store(StoreError::NotFound { .. })
                | AppError::Pipeline(_)
        )
    }

    /// 是否是外部服务（文档提取 / LLM）失败
    pub fn is_upstream(&self) -> bool {
        matches!(self, AppError::Api(_) | AppError::Llm(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
