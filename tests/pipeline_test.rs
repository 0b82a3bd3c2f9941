use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use study_assist::error::{ApiError, AppError, AppResult, LlmError, PipelineError, StoreError};
use study_assist::models::{Answer, SectionState, Stage};
use study_assist::{
    logger, App, Config, MemoryStore, QuizVariant, SectionCtx, Store, TextExtractor,
    TextGenerator,
};

const DOCUMENT_TEXT: &str = "Plants use light to turn carbon dioxide and water into glucose.";

const QUIZ_RESPONSE: &str = "\
1, What gas do plants absorb?
A, Carbon dioxide
B, Oxygen
C, Nitrogen
D, Helium
A

2, Where does photosynthesis happen?
A, Mitochondria
B, Chloroplast
C, Nucleus
D, Ribosome
B

3, What is produced?
A, Salt
B, Iron
C, Glucose
D, Sand
C
";

const EXPLANATION_RESPONSE: &str = "\
Question Number: 1
Correct Answer: A
Your Answer: A
Correctness: Correct
Explanation: Plants take in carbon dioxide.

Question Number: 2
Correct Answer: B
Your Answer: A
Correctness: Incorrect
Explanation: Chloroplasts hold chlorophyll.

Question Number: 3
Correct Answer: C
Your Answer: D
Correctness: Incorrect
Explanation: Glucose is the sugar made.
";

const TOPIC_RESPONSE: &str = "\
Weak Point 1: Organelles
Explanation: Chloroplasts host photosynthesis.
Weak Point 2: Products
Explanation: Glucose is the main product.
";

/// 按顺序返回预设回复，并记录收到的提示词
#[derive(Default)]
struct ScriptedGenerator {
    responses: Mutex<VecDeque<AppResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn push_ok(&self, response: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(response.to_string()));
    }

    fn push_err(&self) {
        self.responses.lock().unwrap().push_back(Err(LlmError::Timeout {
            model: "scripted".to_string(),
            seconds: 1,
        }
        .into()));
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::EmptyContent {
                    model: "scripted".to_string(),
                }
                .into())
            })
    }
}

/// 固定返回文档文本，可切换为失败
#[derive(Default)]
struct FakeExtractor {
    fail: Mutex<bool>,
}

#[async_trait]
impl TextExtractor for FakeExtractor {
    async fn extract_text(&self, file_link: &str) -> AppResult<String> {
        if *self.fail.lock().unwrap() {
            return Err(ApiError::BadResponse {
                endpoint: file_link.to_string(),
                status: Some(500),
                message: None,
            }
            .into());
        }
        Ok(DOCUMENT_TEXT.to_string())
    }
}

struct Harness {
    app: App,
    store: Arc<MemoryStore>,
    generator: Arc<ScriptedGenerator>,
    extractor: Arc<FakeExtractor>,
}

fn harness() -> Harness {
    logger::init();

    let config = Config {
        quiz_variant: QuizVariant::Short,
        ..Config::default()
    };
    let store = Arc::new(MemoryStore::new());
    let generator = Arc::new(ScriptedGenerator::default());
    let extractor = Arc::new(FakeExtractor::default());

    let app = App::with_services(config, store.clone(), extractor.clone(), generator.clone());
    Harness {
        app,
        store,
        generator,
        extractor,
    }
}

/// 创建学习单元并出题
async fn section_with_quiz(h: &Harness, user: &str) -> SectionCtx {
    let section = h
        .app
        .flow()
        .create_section(user, "Biology", "bio.pdf", "https://files.example/bio.pdf")
        .await
        .unwrap();
    let ctx = SectionCtx::new(section.id, user);

    h.generator.push_ok(QUIZ_RESPONSE);
    h.app.flow().generate_quiz(&ctx).await.unwrap();
    ctx
}

fn one_right_two_wrong() -> Vec<Answer> {
    vec![Answer::new(1, "A"), Answer::new(2, "A"), Answer::new(3, "D")]
}

fn all_right() -> Vec<Answer> {
    vec![Answer::new(1, "A"), Answer::new(2, "b"), Answer::new(3, "C")]
}

async fn state_of(h: &Harness, ctx: &SectionCtx) -> SectionState {
    h.store
        .find_section(&ctx.section_id, &ctx.user_id)
        .await
        .unwrap()
        .state
}

async fn turn_count(h: &Harness, ctx: &SectionCtx) -> usize {
    let section = h
        .store
        .find_section(&ctx.section_id, &ctx.user_id)
        .await
        .unwrap();
    h.store
        .find_conversation(section.conversation_id.as_deref().unwrap())
        .await
        .unwrap()
        .len()
}

#[tokio::test]
async fn test_full_pipeline() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;
    assert_eq!(state_of(&h, &ctx).await, SectionState::QuizGenerated);

    let quiz = h.app.views().view_quiz(&ctx).await.unwrap();
    assert_eq!(quiz.questions.len(), 3);
    assert_eq!(quiz.questions[1].b, "Chloroplast");
    assert!(!quiz.taken);

    // 出题提示词包含文档文本，且没有历史上下文
    let prompts = h.generator.prompts();
    assert!(prompts[0].contains("Generate 10 multiple-choice questions"));
    assert!(prompts[0].contains(DOCUMENT_TEXT));
    assert!(!prompts[0].contains("Previous conversation:"));

    // 批改 + 解析
    h.generator.push_ok(EXPLANATION_RESPONSE);
    let outcome = h
        .app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();
    assert_eq!(outcome.grade.score, 1);
    assert_eq!(outcome.grade.max_score, 3);
    assert!(!outcome.grade.already_taken);
    let explanations = outcome.explanations.unwrap();
    assert_eq!(explanations.len(), 3);
    assert!(explanations[0].correctness);
    assert!(!explanations[2].correctness);
    assert_eq!(state_of(&h, &ctx).await, SectionState::Explained);

    let prompts = h.generator.prompts();
    let explain_prompt = &prompts[1];
    assert!(explain_prompt.starts_with("Previous conversation:\nUser: "));
    assert!(explain_prompt.contains(QUIZ_RESPONSE.trim_end()));
    assert!(explain_prompt.contains("QuestionNumber : 2, Answer :A\n"));

    // 薄弱点：上下文只有出题轮
    h.generator.push_ok(TOPIC_RESPONSE);
    let topics = h.app.flow().extract_topics(&ctx).await.unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics.topics[0].title, "Organelles");
    assert_eq!(state_of(&h, &ctx).await, SectionState::TopicsExtracted);
    assert_eq!(turn_count(&h, &ctx).await, 3);

    let prompts = h.generator.prompts();
    let topic_prompt = &prompts[2];
    assert!(topic_prompt.contains(QUIZ_RESPONSE.trim_end()));
    assert!(!topic_prompt.contains("Chloroplasts hold chlorophyll."));
    assert!(topic_prompt.contains("QuestionNumber : 3, Answer :D\n"));

    // 查看接口从对话重新解析
    assert_eq!(h.app.views().view_topics(&ctx).await.unwrap(), topics);
    assert_eq!(
        h.app.views().view_explanations(&ctx).await.unwrap(),
        explanations
    );

    let detail = h.app.views().section_detail(&ctx).await.unwrap();
    assert_eq!(detail.section.state, SectionState::TopicsExtracted);
    assert!(detail.quiz.unwrap().taken);
    assert_eq!(detail.topics, Some(topics));
}

#[tokio::test]
async fn test_conversation_stages_are_tagged_in_order() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;
    h.generator.push_ok(EXPLANATION_RESPONSE);
    h.app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();
    h.generator.push_ok(TOPIC_RESPONSE);
    h.app.flow().extract_topics(&ctx).await.unwrap();

    let section = h
        .store
        .find_section(&ctx.section_id, &ctx.user_id)
        .await
        .unwrap();
    let conversation = h
        .store
        .find_conversation(section.conversation_id.as_deref().unwrap())
        .await
        .unwrap();

    let stages: Vec<Stage> = conversation.turns.iter().map(|t| t.stage).collect();
    assert_eq!(
        stages,
        vec![Stage::QuizGeneration, Stage::Explanation, Stage::TopicExtraction]
    );
    assert_eq!(conversation.turns[0].model, QUIZ_RESPONSE);
}

#[tokio::test]
async fn test_second_grading_gives_same_score_without_explanation() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    h.generator.push_ok(EXPLANATION_RESPONSE);
    let first = h
        .app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();
    let second = h
        .app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();

    assert_eq!(first.grade.score, second.grade.score);
    assert!(second.grade.already_taken);
    assert!(second.explanations.is_none());
    assert_eq!(h.generator.prompts().len(), 2);
    assert_eq!(turn_count(&h, &ctx).await, 2);
    assert_eq!(state_of(&h, &ctx).await, SectionState::Explained);
}

#[tokio::test]
async fn test_topics_are_extracted_only_once() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;
    h.generator.push_ok(EXPLANATION_RESPONSE);
    h.app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();
    h.generator.push_ok(TOPIC_RESPONSE);
    h.app.flow().extract_topics(&ctx).await.unwrap();

    h.generator.push_ok(TOPIC_RESPONSE);
    let err = h.app.flow().extract_topics(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Pipeline(PipelineError::TopicsAlreadyExtracted { turns: 3, .. })
    ));
    assert_eq!(turn_count(&h, &ctx).await, 3);
    assert_eq!(h.generator.prompts().len(), 3);
}

#[tokio::test]
async fn test_perfect_score_skips_explanation() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    let outcome = h.app.flow().submit_answers(&ctx, all_right()).await.unwrap();
    assert_eq!(outcome.grade.score, 3);
    assert!(outcome.grade.is_perfect());
    assert!(outcome.explanations.is_none());
    assert_eq!(state_of(&h, &ctx).await, SectionState::Graded);
    assert_eq!(h.generator.prompts().len(), 1);

    // 没有答案记录时不能提取薄弱点
    let err = h.app.flow().extract_topics(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Pipeline(PipelineError::AnswersMissing { .. })
    ));
    assert!(h.app.views().view_topics(&ctx).await.is_err());

    let detail = h.app.views().section_detail(&ctx).await.unwrap();
    assert!(detail.topics.is_none());
}

#[tokio::test]
async fn test_generation_failure_leaves_section_unchanged() {
    let h = harness();
    let section = h
        .app
        .flow()
        .create_section("alice", "Biology", "bio.pdf", "https://files.example/bio.pdf")
        .await
        .unwrap();
    let ctx = SectionCtx::new(section.id, "alice");

    h.generator.push_err();
    let err = h.app.flow().generate_quiz(&ctx).await.unwrap_err();
    assert!(err.is_upstream());

    let unchanged = h
        .store
        .find_section(&ctx.section_id, "alice")
        .await
        .unwrap();
    assert_eq!(unchanged.state, SectionState::Created);
    assert!(unchanged.quiz_id.is_none());
    assert!(unchanged.conversation_id.is_none());

    // 文本提取失败时不会调用模型
    *h.extractor.fail.lock().unwrap() = true;
    assert!(h.app.flow().generate_quiz(&ctx).await.unwrap_err().is_upstream());
    assert_eq!(h.generator.prompts().len(), 1);

    // 恢复后可以重试
    *h.extractor.fail.lock().unwrap() = false;
    h.generator.push_ok(QUIZ_RESPONSE);
    let quiz = h.app.flow().generate_quiz(&ctx).await.unwrap();
    assert_eq!(quiz.questions.len(), 3);
    assert_eq!(turn_count(&h, &ctx).await, 1);
}

#[tokio::test]
async fn test_explanation_failure_keeps_section_graded() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    h.generator.push_err();
    let err = h
        .app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap_err();
    assert!(err.is_upstream());

    let section = h
        .store
        .find_section(&ctx.section_id, "alice")
        .await
        .unwrap();
    // 批改已经发生（测验已标记），解析失败不写答案记录与解析轮次
    assert_eq!(section.state, SectionState::Graded);
    assert!(section.answers_id.is_none());
    assert_eq!(turn_count(&h, &ctx).await, 1);
    assert!(h.app.views().view_quiz(&ctx).await.unwrap().taken);
}

#[tokio::test]
async fn test_unnumbered_answers_are_numbered_in_prompt_and_record() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    h.generator.push_ok(EXPLANATION_RESPONSE);
    let outcome = h
        .app
        .flow()
        .submit_answers(
            &ctx,
            vec![Answer::new(0, "A"), Answer::new(0, "B"), Answer::new(0, "D")],
        )
        .await
        .unwrap();
    assert_eq!(outcome.grade.score, 2);

    let prompts = h.generator.prompts();
    assert!(prompts[1].contains("QuestionNumber : 2, Answer :B\n"));
    assert!(!prompts[1].contains("QuestionNumber : 0"));

    let section = h
        .store
        .find_section(&ctx.section_id, "alice")
        .await
        .unwrap();
    let stored = h
        .store
        .find_answer_list(section.answers_id.as_deref().unwrap())
        .await
        .unwrap();
    assert_eq!(
        stored.answers,
        vec![Answer::new(1, "A"), Answer::new(2, "B"), Answer::new(3, "D")]
    );
}

#[tokio::test]
async fn test_repeated_question_numbers_cannot_fake_a_perfect_score() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    let err = h
        .app
        .flow()
        .submit_answers(
            &ctx,
            vec![Answer::new(1, "A"), Answer::new(1, "A"), Answer::new(1, "A")],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Pipeline(PipelineError::DuplicateAnswer { question_no: 1 })
    ));
    assert_eq!(state_of(&h, &ctx).await, SectionState::QuizGenerated);

    // 之后的有效提交仍是首次作答，会生成解析
    h.generator.push_ok(EXPLANATION_RESPONSE);
    let outcome = h
        .app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();
    assert!(!outcome.grade.already_taken);
    assert!(outcome.explanations.is_some());
}

#[tokio::test]
async fn test_late_repeat_submission_keeps_explained_progress() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;
    h.generator.push_ok(EXPLANATION_RESPONSE);
    h.app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();

    let repeat = h.app.flow().submit_answers(&ctx, all_right()).await.unwrap();
    assert!(repeat.grade.already_taken);

    let section = h
        .store
        .find_section(&ctx.section_id, "alice")
        .await
        .unwrap();
    assert_eq!(section.state, SectionState::Explained);
    assert!(section.answers_id.is_some());
}

#[tokio::test]
async fn test_quiz_is_generated_once() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    let err = h.app.flow().generate_quiz(&ctx).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Pipeline(PipelineError::QuizAlreadyGenerated { .. })
    ));
    assert_eq!(h.generator.prompts().len(), 1);
}

#[tokio::test]
async fn test_answer_count_mismatch_is_rejected() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;

    let err = h
        .app
        .flow()
        .submit_answers(&ctx, vec![Answer::new(1, "A")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Pipeline(PipelineError::AnswerCountMismatch {
            expected: 3,
            actual: 1
        })
    ));
    assert!(err.is_client_error());
    assert_eq!(state_of(&h, &ctx).await, SectionState::QuizGenerated);

    // 被拒绝的提交不算作答
    h.generator.push_ok(EXPLANATION_RESPONSE);
    let outcome = h
        .app
        .flow()
        .submit_answers(&ctx, one_right_two_wrong())
        .await
        .unwrap();
    assert!(!outcome.grade.already_taken);
    assert!(outcome.explanations.is_some());
}

#[tokio::test]
async fn test_stage_guards_before_quiz() {
    let h = harness();
    let section = h
        .app
        .flow()
        .create_section("alice", "Biology", "bio.pdf", "https://files.example/bio.pdf")
        .await
        .unwrap();
    let ctx = SectionCtx::new(section.id, "alice");

    assert!(matches!(
        h.app.flow().submit_answers(&ctx, vec![]).await.unwrap_err(),
        AppError::Pipeline(PipelineError::QuizNotGenerated { .. })
    ));
    assert!(matches!(
        h.app.flow().extract_topics(&ctx).await.unwrap_err(),
        AppError::Pipeline(PipelineError::AnswersMissing { .. })
    ));
    assert!(h.app.views().view_quiz(&ctx).await.is_err());
    assert!(h.app.views().view_explanations(&ctx).await.is_err());
}

#[tokio::test]
async fn test_bad_and_unknown_section_ids() {
    let h = harness();

    let bad = h
        .app
        .flow()
        .generate_quiz(&SectionCtx::new("not-a-uuid", "alice"))
        .await
        .unwrap_err();
    assert!(matches!(bad, AppError::Store(StoreError::InvalidId { .. })));

    let unknown = h
        .app
        .views()
        .view_quiz(&SectionCtx::new(
            "00000000-0000-4000-8000-000000000000",
            "alice",
        ))
        .await
        .unwrap_err();
    assert!(matches!(unknown, AppError::Store(StoreError::NotFound { .. })));
    assert!(unknown.is_client_error());
}

#[tokio::test]
async fn test_sections_are_private_to_owner() {
    let h = harness();
    let ctx = section_with_quiz(&h, "alice").await;
    let intruder = SectionCtx::new(ctx.section_id.clone(), "bob");

    assert!(matches!(
        h.app.views().view_quiz(&intruder).await.unwrap_err(),
        AppError::Store(StoreError::NotFound { .. })
    ));
    assert!(h
        .app
        .flow()
        .submit_answers(&intruder, one_right_two_wrong())
        .await
        .is_err());

    assert_eq!(h.app.views().section_list("alice").await.unwrap().len(), 1);
    assert!(h.app.views().section_list("bob").await.unwrap().is_empty());
}
