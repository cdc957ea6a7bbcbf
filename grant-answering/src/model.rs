//! Wire-facing data model: grant questions, grant track information with a
//! string-keyed field catalog, and the answer artifacts.

use profile_store::ProfileSection;
use serde::{Deserialize, Serialize};

/// Question answer modality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Table,
    Document,
    Number,
    Date,
    Boolean,
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            QuestionType::Text => "text",
            QuestionType::Table => "table",
            QuestionType::Document => "document",
            QuestionType::Number => "number",
            QuestionType::Date => "date",
            QuestionType::Boolean => "boolean",
        };
        f.write_str(s)
    }
}

impl QuestionType {
    /// True for question types whose correct answer depends on an uploaded
    /// artifact outside this system's authority. Such questions are never
    /// sent to the answer prompt; their answer stays absent.
    pub fn requires_external_source(&self) -> bool {
        matches!(self, QuestionType::Document)
    }
}

/// One item in a grant application form. Immutable input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrantQuestion {
    /// Opaque identifier, e.g. `"5.2"`.
    pub identifier: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// Free-text category, e.g. `"5. Innovation"`.
    pub category: String,
    pub title: String,
    /// The question text itself.
    pub question: String,
    /// Instructions for the structure of the answer.
    pub answer_structure_instructions: String,
    /// Instructions for the content/formatting/sentiment of the answer.
    pub answer_content_instructions: String,
}

/// Grant-amount terms of a track.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrantAmount {
    pub percentage: f64,
    pub maximum_amount: u64,
    pub currency: String,
    pub duration_months: u32,
    pub maximum_budget: u64,
}

/// Company-level requirements of a track.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompanyRequirements {
    pub max_annual_income: u64,
    pub max_funding_raised: u64,
    pub currency: String,
}

/// Royalty-payment terms of a track.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoyaltyTerms {
    pub percentage: f64,
    pub trigger: String,
}

/// Structured description of a grant track. Immutable input.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrantInformation {
    pub track_name: String,
    pub description: String,
    pub purpose: String,
    pub target_audience: String,
    pub grant_amount: GrantAmount,
    pub eligible_expenses: Vec<String>,
    pub benefits: Vec<String>,
    pub eligibility_conditions: Vec<String>,
    pub company_requirements: CompanyRequirements,
    pub obligations: Vec<String>,
    pub royalty_terms: RoyaltyTerms,
    pub evaluation_criteria: Vec<String>,
}

/// One entry of the static field catalog.
pub struct GrantField {
    pub name: &'static str,
    pub description: &'static str,
}

impl GrantInformation {
    /// Field catalog used to build the relevance prompt: every named field
    /// with its human-readable description.
    pub const FIELDS: [GrantField; 12] = [
        GrantField {
            name: "track_name",
            description: "Name of the grant track (e.g., 'Tnufa')",
        },
        GrantField {
            name: "description",
            description: "General description of the track",
        },
        GrantField {
            name: "purpose",
            description: "The main purpose/goal of the grant track",
        },
        GrantField {
            name: "target_audience",
            description: "Description of who is eligible for the grant",
        },
        GrantField {
            name: "grant_amount",
            description: "Details about the grant amount",
        },
        GrantField {
            name: "eligible_expenses",
            description: "List of expenses that can be covered by the grant",
        },
        GrantField {
            name: "benefits",
            description: "Key benefits of the grant program",
        },
        GrantField {
            name: "eligibility_conditions",
            description: "List of conditions that must be met to be eligible",
        },
        GrantField {
            name: "company_requirements",
            description: "Specific requirements for companies",
        },
        GrantField {
            name: "obligations",
            description: "Legal and regulatory obligations for grant recipients",
        },
        GrantField {
            name: "royalty_terms",
            description: "Terms for royalty payments",
        },
        GrantField {
            name: "evaluation_criteria",
            description: "Criteria used to evaluate grant applications",
        },
    ];

    /// String-keyed accessor over the schema's actual fields.
    ///
    /// Returns `None` for unknown names — the first-class "not found" result
    /// used to drop hallucinated field names from model output. No
    /// reflection: every field is registered here explicitly.
    pub fn field_value(&self, name: &str) -> Option<String> {
        match name {
            "track_name" => Some(self.track_name.clone()),
            "description" => Some(self.description.clone()),
            "purpose" => Some(self.purpose.clone()),
            "target_audience" => Some(self.target_audience.clone()),
            "grant_amount" => serde_json::to_string(&self.grant_amount).ok(),
            "eligible_expenses" => Some(self.eligible_expenses.join("; ")),
            "benefits" => Some(self.benefits.join("; ")),
            "eligibility_conditions" => Some(self.eligibility_conditions.join("; ")),
            "company_requirements" => serde_json::to_string(&self.company_requirements).ok(),
            "obligations" => Some(self.obligations.join("; ")),
            "royalty_terms" => serde_json::to_string(&self.royalty_terms).ok(),
            "evaluation_criteria" => Some(self.evaluation_criteria.join("; ")),
            _ => None,
        }
    }
}

/// A grant application: the track description plus its question list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Grant {
    pub information: GrantInformation,
    pub questions: Vec<GrantQuestion>,
}

/// Answer to a single question. `answer: None` signals "requires external
/// or manual input" or "generation failed" — never a dropped question.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrantAnswer {
    pub identifier: String,
    pub category: String,
    pub title: String,
    pub answer: Option<String>,
}

/// Ordered answers, one per input question, always length-equal to the
/// question list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GrantResponse {
    pub answers: Vec<GrantAnswer>,
}

/// Deduplicated set of profile sections contributed by hybrid retrieval.
#[derive(Clone, Debug, Default)]
pub struct SearchResult {
    pub sections: Vec<ProfileSection>,
}

impl SearchResult {
    /// Serializes the context into the innovator-profile prompt block.
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.render())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_information() -> GrantInformation {
        GrantInformation {
            track_name: "Tnufa".into(),
            description: "Early-stage incentive track".into(),
            purpose: "Support pre-seed innovators".into(),
            target_audience: "Entrepreneurs and early-stage startups".into(),
            grant_amount: GrantAmount {
                percentage: 80.0,
                maximum_amount: 200_000,
                currency: "NIS".into(),
                duration_months: 12,
                maximum_budget: 250_000,
            },
            eligible_expenses: vec!["Prototype development".into(), "IP registration".into()],
            benefits: vec!["Non-dilutive funding".into()],
            eligibility_conditions: vec!["Israeli registered company".into()],
            company_requirements: CompanyRequirements {
                max_annual_income: 200_000,
                max_funding_raised: 500_000,
                currency: "NIS".into(),
            },
            obligations: vec!["Periodic reporting".into()],
            royalty_terms: RoyaltyTerms {
                percentage: 3.0,
                trigger: "commercialization and sales".into(),
            },
            evaluation_criteria: vec!["Innovation level".into(), "Market potential".into()],
        }
    }

    pub(crate) fn sample_question() -> GrantQuestion {
        GrantQuestion {
            identifier: "5.2".into(),
            question_type: QuestionType::Text,
            category: "Business".into(),
            title: "Revenue".into(),
            question: "Describe your revenue model".into(),
            answer_structure_instructions: "Two short paragraphs".into(),
            answer_content_instructions: "Quantify where possible".into(),
        }
    }

    #[test]
    fn question_type_parses_lowercase() {
        let q: QuestionType = serde_json::from_str("\"document\"").unwrap();
        assert_eq!(q, QuestionType::Document);
        assert!(q.requires_external_source());
        assert!(!QuestionType::Text.requires_external_source());
    }

    #[test]
    fn field_value_covers_every_catalog_entry() {
        let info = sample_information();
        for field in GrantInformation::FIELDS {
            assert!(
                info.field_value(field.name).is_some(),
                "no accessor for {}",
                field.name
            );
        }
    }

    #[test]
    fn field_value_rejects_unknown_names() {
        let info = sample_information();
        assert!(info.field_value("secret_budget").is_none());
    }
}
