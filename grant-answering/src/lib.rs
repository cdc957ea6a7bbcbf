//! Grant-answering pipeline over an indexed innovator profile.
//!
//! Each grant question runs through hybrid retrieval (keyword taxonomy +
//! LLM title judgement + vector similarity), a two-stage prompt flow
//! (field relevance, then answer composition), and defensive parsing of
//! the model output. Failures are isolated per question: the response
//! always carries one answer per input question.

pub mod cfg;
mod error;
mod model;
mod parse;
mod prompt;
mod provider;
mod taxonomy;

mod answering;

pub use answering::GrantAnswering;
pub use error::AnswerError;
pub use model::{
    CompanyRequirements, Grant, GrantAmount, GrantAnswer, GrantField, GrantInformation,
    GrantQuestion, GrantResponse, QuestionType, RoyaltyTerms, SearchResult,
};
pub use parse::ParseError;
pub use provider::{InnovatorProfileProvider, ProfileSource, SearchConfig, StoreProfileSource};
pub use taxonomy::{SECTION_INFO, TAXONOMY, match_titles, titles_for_category};
