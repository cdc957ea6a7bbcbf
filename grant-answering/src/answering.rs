//! Per-question answering pipeline.
//!
//! Each question runs through: field relevance → context retrieval →
//! answer generation. Failures are isolated at the question boundary: one
//! bad question degrades to a placeholder answer instead of sinking the
//! batch. Only systemic misconfiguration aborts the whole run.

use crate::error::AnswerError;
use crate::model::{Grant, GrantAnswer, GrantInformation, GrantQuestion, GrantResponse};
use crate::parse::{extract_fenced, parse_relevant_fields};
use crate::prompt::{build_answer_prompt, build_relevance_prompt};
use crate::provider::InnovatorProfileProvider;
use llm_service::CompletionProvider;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Placeholder emitted when a question's pipeline fails unrecoverably but
/// non-fatally.
const PROCESSING_ERROR_ANSWER: &str = "Error processing question";

/// Answers grant application questions from an indexed innovator profile.
pub struct GrantAnswering {
    llm: Arc<dyn CompletionProvider>,
    provider: InnovatorProfileProvider,
}

impl GrantAnswering {
    pub fn new(llm: Arc<dyn CompletionProvider>, provider: InnovatorProfileProvider) -> Self {
        Self { llm, provider }
    }

    /// Stage one: which grant-information fields matter for this question.
    ///
    /// Degrades to an empty mapping on any model or parse failure; the
    /// answer prompt simply omits the grant-information block then.
    async fn relevant_fields(
        &self,
        info: &GrantInformation,
        question: &GrantQuestion,
    ) -> BTreeMap<String, String> {
        let prompt = build_relevance_prompt(info, question);
        let response = match self.llm.complete(&prompt).await {
            Ok(r) => r,
            Err(err) => {
                warn!(
                    identifier = %question.identifier,
                    error = %err,
                    "relevance judgement failed, proceeding with no fields"
                );
                return BTreeMap::new();
            }
        };
        match parse_relevant_fields(&response) {
            Ok(fields) => fields,
            Err(err) => {
                warn!(
                    identifier = %question.identifier,
                    error = %err,
                    "relevance response unparseable, proceeding with no fields"
                );
                BTreeMap::new()
            }
        }
    }

    /// Stage two: compose the answer. `None` means "requires external or
    /// manual input" or "generation did not produce a usable answer".
    async fn generate_answer(
        &self,
        entity_id: &str,
        info: &GrantInformation,
        question: &GrantQuestion,
        relevant_fields: &BTreeMap<String, String>,
    ) -> Result<Option<String>, AnswerError> {
        if question.question_type.requires_external_source() {
            info!(
                identifier = %question.identifier,
                "question requires an external artifact, skipping generation"
            );
            return Ok(None);
        }

        // Retrieval failures propagate to the per-question boundary; the
        // model call and fence extraction degrade to a null answer here.
        let context = self.provider.relevant_context(entity_id, question).await?;

        let prompt = build_answer_prompt(info, question, relevant_fields, &context.render());
        let response = match self.llm.complete(&prompt).await {
            Ok(r) => r,
            Err(err) => {
                warn!(
                    identifier = %question.identifier,
                    error = %err,
                    "answer generation failed"
                );
                return Ok(None);
            }
        };

        match extract_fenced(&response, "markdown") {
            Ok(answer) => Ok(Some(answer.to_string())),
            Err(err) => {
                warn!(
                    identifier = %question.identifier,
                    error = %err,
                    "answer lacked a fenced markdown block"
                );
                Ok(None)
            }
        }
    }

    /// Runs the full state machine for one question.
    pub async fn answer_question(
        &self,
        entity_id: &str,
        info: &GrantInformation,
        question: &GrantQuestion,
    ) -> Result<GrantAnswer, AnswerError> {
        let fields = self.relevant_fields(info, question).await;
        let answer = self
            .generate_answer(entity_id, info, question, &fields)
            .await?;
        Ok(GrantAnswer {
            identifier: question.identifier.clone(),
            category: question.category.clone(),
            title: question.title.clone(),
            answer,
        })
    }

    /// Answers every question of a grant application, in input order.
    ///
    /// The response always has one answer per question. Per-question
    /// failures become placeholder answers; only fatal configuration
    /// errors abort the batch.
    pub async fn process_grant_application(
        &self,
        entity_id: &str,
        grant: &Grant,
    ) -> Result<GrantResponse, AnswerError> {
        let mut answers = Vec::with_capacity(grant.questions.len());
        for question in &grant.questions {
            match self
                .answer_question(entity_id, &grant.information, question)
                .await
            {
                Ok(answer) => answers.push(answer),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(
                        identifier = %question.identifier,
                        error = %err,
                        "question failed, emitting placeholder answer"
                    );
                    answers.push(GrantAnswer {
                        identifier: question.identifier.clone(),
                        category: question.category.clone(),
                        title: question.title.clone(),
                        answer: Some(PROCESSING_ERROR_ANSWER.to_string()),
                    });
                }
            }
        }
        info!(
            entity_id,
            questions = grant.questions.len(),
            "grant application processed"
        );
        Ok(GrantResponse { answers })
    }
}
