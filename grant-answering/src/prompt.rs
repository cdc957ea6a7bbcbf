//! Prompt construction for the two-stage answering flow.
//!
//! Stage one is a *relevance prompt*: which grant-information fields matter
//! for this question. Stage two is the *answer prompt*: compose the final
//! answer from those fields, the question, and the retrieved profile text.
//! A third, smaller prompt asks the model to pick section titles for
//! retrieval.

use crate::model::{GrantInformation, GrantQuestion};
use profile_store::SectionTitle;
use std::collections::BTreeMap;
use std::fmt::Write;

pub const SYSTEM_CONTEXT: &str = "You are an expert grant consultant with years of experience in helping innovators secure funding.\nYour role is to provide strategic, compelling, and well-crafted responses that highlight the alignment between the innovator's strengths and the grant's objectives.";

/// `grant_amount` → `Grant Amount`.
pub fn display_name(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Asks the model to pick at most five canonical section titles for a
/// question. The response is parsed with [`crate::parse::parse_title_list`].
pub fn build_title_selection_prompt(question: &GrantQuestion) -> String {
    let mut p = String::new();
    p.push_str(SYSTEM_CONTEXT);
    p.push_str("\n\nA grant application question needs supporting material from an innovator profile.\nThe profile is organized into the following sections:\n");
    for title in SectionTitle::ALL {
        let _ = writeln!(p, "- {}", title.as_str());
    }
    let _ = write!(
        p,
        "\nQuestion Context:\nCategory: {}\nTitle: {}\nQuestion: {}\n\nReturn a comma-separated list of at most 5 section titles from the list above, ordered from most to least relevant. Return only the list, with no additional text.",
        question.category, question.title, question.question
    );
    p
}

/// Builds the relevance prompt: all grant-information fields with their
/// descriptions, asking which subset helps answer this question.
pub fn build_relevance_prompt(_info: &GrantInformation, question: &GrantQuestion) -> String {
    let mut p = String::new();
    p.push_str(SYSTEM_CONTEXT);
    p.push_str("\n\nAnalyze this grant question strategically. Identify the key grant information fields that would help craft a compelling and competitive response. For each relevant field, explain how it can be leveraged to strengthen the application.");
    let _ = write!(
        p,
        "\n\nQuestion Context:\nCategory: {}\nType: {}\nQuestion: {}",
        question.category, question.question_type, question.question
    );

    p.push_str("\n\nAvailable Grant Information Fields:");
    for field in GrantInformation::FIELDS {
        let _ = write!(p, "\n- {}: {}", display_name(field.name), field.description);
    }

    p.push_str(concat!(
        "\n\nProvide your response in the following format:\n",
        "```json\n",
        "{\n",
        "    \"relevant_fields\": {\n",
        "        \"field_name\": \"reason for relevance\",\n",
        "        ...\n",
        "    }\n",
        "}\n",
        "```\n",
        "\nInclude only the fields that are directly relevant to answering this specific question."
    ));
    p
}

/// Builds the final answer prompt. Only fields the relevance stage named
/// AND that actually exist on the schema are included; hallucinated field
/// names are dropped here.
pub fn build_answer_prompt(
    info: &GrantInformation,
    question: &GrantQuestion,
    relevant_fields: &BTreeMap<String, String>,
    innovator_profile: &str,
) -> String {
    let mut p = String::new();
    p.push_str(SYSTEM_CONTEXT);

    let known: Vec<(&str, String, &str)> = relevant_fields
        .iter()
        .filter_map(|(name, reason)| {
            info.field_value(name)
                .map(|value| (name.as_str(), value, reason.as_str()))
        })
        .collect();

    if !known.is_empty() {
        p.push_str("\n\nRelevant Grant Information:");
        for (name, value, reason) in &known {
            let _ = write!(p, "\n{}: {}", display_name(name), value);
            let _ = write!(p, "\n(Relevant because: {reason})");
        }
    }

    let _ = write!(
        p,
        "\n\nQuestion Details:\nCategory: {}\nType: {}\nQuestion: {}",
        question.category, question.question_type, question.question
    );

    let _ = write!(
        p,
        "\n\nResponse Strategy:\nStructure: {} Craft your response in a clear, professional markdown format that emphasizes key points and maintains a confident, authoritative tone throughout.",
        question.answer_structure_instructions
    );
    let _ = write!(
        p,
        "\nContent Approach: {} Your response should be compelling and strategic, demonstrating deep understanding of both the grant's objectives and the innovation's potential. Use concrete examples and specific details to build credibility. Maintain a professional yet engaging tone that conveys expertise and vision. Use only content from the innovator's profile. Do not use any other information. Be focused on the question and the grant information. Provide a focused answer to the question.",
        question.answer_content_instructions
    );

    p.push_str(concat!(
        "\nStrategic Focus:\n",
        "- Align the innovator's profile with the grant's objectives and evaluation criteria\n",
        "- Emphasize unique strengths and competitive advantages\n",
        "- Demonstrate clear understanding of the grant's purpose and requirements\n",
        "- Address potential concerns proactively\n",
        "- Use specific, quantifiable details where possible\n",
        "- Maintain a confident yet grounded tone\n",
        "- Show forward-thinking vision while remaining practical"
    ));

    p.push_str(concat!(
        "\nKey Principles:\n",
        "1. Be specific and substantive - avoid generic statements\n",
        "2. Show don't tell - use concrete examples\n",
        "3. Demonstrate strategic thinking and long-term vision\n",
        "4. Address evaluation criteria both explicitly and implicitly\n",
        "5. Maintain professional enthusiasm and confidence\n",
        "6. Focus on value creation and impact"
    ));

    let _ = write!(p, "\n\nInnovator Context:\n{innovator_profile}");

    p.push_str(concat!(
        "\n\nCrafting Guidelines:\n",
        "- Write in a clear, professional tone that builds credibility\n",
        "- Use specific examples and metrics where possible\n",
        "- Demonstrate strategic thinking and vision\n",
        "- Show clear alignment with grant objectives\n",
        "- Maintain confidence while being realistic\n",
        "- Focus on unique value proposition and impact potential"
    ));

    p.push_str("\n\nImportant: Your response should read as if written by a seasoned professional with deep industry expertise. Avoid generic or overly formal language. Instead, craft a response that demonstrates strategic thinking, clear vision, and compelling potential. Start with ```markdown and end with ```.");

    let _ = write!(
        p,
        "\n\nQuestion to Address:\n{}\n\nStrategic Response:",
        question.question
    );
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{sample_information, sample_question};

    #[test]
    fn display_name_title_cases_snake_case() {
        assert_eq!(display_name("grant_amount"), "Grant Amount");
        assert_eq!(display_name("name"), "Name");
        assert_eq!(display_name("royalty_terms"), "Royalty Terms");
    }

    #[test]
    fn relevance_prompt_lists_every_field() {
        let prompt = build_relevance_prompt(&sample_information(), &sample_question());
        for field in GrantInformation::FIELDS {
            assert!(
                prompt.contains(&display_name(field.name)),
                "missing field {}",
                field.name
            );
            assert!(prompt.contains(field.description));
        }
        assert!(prompt.contains("```json"));
        assert!(prompt.contains("\"relevant_fields\""));
    }

    #[test]
    fn title_selection_prompt_lists_the_full_catalog() {
        let prompt = build_title_selection_prompt(&sample_question());
        for title in SectionTitle::ALL {
            assert!(prompt.contains(title.as_str()));
        }
        assert!(prompt.contains("at most 5"));
    }

    #[test]
    fn answer_prompt_drops_hallucinated_fields() {
        let mut fields = BTreeMap::new();
        fields.insert("grant_amount".to_string(), "funding scope".to_string());
        fields.insert("flux_capacitor".to_string(), "made up".to_string());
        let prompt = build_answer_prompt(
            &sample_information(),
            &sample_question(),
            &fields,
            "### Introduction\nAcme builds widgets.",
        );
        assert!(prompt.contains("Grant Amount"));
        assert!(!prompt.contains("Flux Capacitor"));
        assert!(!prompt.contains("made up"));
        assert!(prompt.contains("Acme builds widgets."));
    }

    #[test]
    fn answer_prompt_omits_block_when_nothing_relevant() {
        let prompt = build_answer_prompt(
            &sample_information(),
            &sample_question(),
            &BTreeMap::new(),
            "profile",
        );
        assert!(!prompt.contains("Relevant Grant Information:"));
        assert!(prompt.contains("Strategic Response:"));
    }
}
