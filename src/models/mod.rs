pub mod answer;
pub mod conversation;
pub mod document;
pub mod question;
pub mod section;
pub mod topic;

pub use answer::{Answer, AnswerList, QuestionAnswerExplanation};
pub use conversation::{Conversation, ConversationTurn, Stage};
pub use document::PdfDocument;
pub use question::{Question, Quiz};
pub use section::{Section, SectionState};
pub use topic::{Topic, TopicList};
