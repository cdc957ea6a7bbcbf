//! Canonical profile sections: the closed title enumeration, the stored
//! payload shape, and prompt rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Closed enumeration of canonical profile-section titles.
///
/// Every indexed point carries exactly one of these as its `title` payload
/// field. `Ord` follows declaration order, which gives candidate sets a
/// stable, deterministic iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionTitle {
    #[serde(rename = "Introduction")]
    Introduction,
    #[serde(rename = "The Problem")]
    Problem,
    #[serde(rename = "The Need")]
    Need,
    #[serde(rename = "The Solution")]
    Solution,
    #[serde(rename = "The Business Model")]
    BusinessModel,
    #[serde(rename = "Go-to-Market Strategy")]
    GoToMarket,
    #[serde(rename = "Market Opportunity")]
    MarketOpportunity,
    #[serde(rename = "Technology/Innovation")]
    TechnologyInnovation,
    #[serde(rename = "Competitive Analysis")]
    CompetitiveAnalysis,
    #[serde(rename = "Traction and Validation")]
    TractionValidation,
    #[serde(rename = "Team and Leadership")]
    TeamLeadership,
    #[serde(rename = "Financial Information")]
    FinancialInformation,
    #[serde(rename = "Development and Execution")]
    DevelopmentExecution,
    #[serde(rename = "Legal and Compliance")]
    LegalCompliance,
    #[serde(rename = "Impact and Innovation")]
    ImpactInnovation,
    #[serde(rename = "Additional Supporting Information")]
    AdditionalSupportingInformation,
    #[serde(rename = "Others")]
    Others,
}

impl SectionTitle {
    /// Full catalog, in canonical order.
    pub const ALL: [SectionTitle; 17] = [
        SectionTitle::Introduction,
        SectionTitle::Problem,
        SectionTitle::Need,
        SectionTitle::Solution,
        SectionTitle::BusinessModel,
        SectionTitle::GoToMarket,
        SectionTitle::MarketOpportunity,
        SectionTitle::TechnologyInnovation,
        SectionTitle::CompetitiveAnalysis,
        SectionTitle::TractionValidation,
        SectionTitle::TeamLeadership,
        SectionTitle::FinancialInformation,
        SectionTitle::DevelopmentExecution,
        SectionTitle::LegalCompliance,
        SectionTitle::ImpactInnovation,
        SectionTitle::AdditionalSupportingInformation,
        SectionTitle::Others,
    ];

    /// Canonical display string (also the stored payload value).
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionTitle::Introduction => "Introduction",
            SectionTitle::Problem => "The Problem",
            SectionTitle::Need => "The Need",
            SectionTitle::Solution => "The Solution",
            SectionTitle::BusinessModel => "The Business Model",
            SectionTitle::GoToMarket => "Go-to-Market Strategy",
            SectionTitle::MarketOpportunity => "Market Opportunity",
            SectionTitle::TechnologyInnovation => "Technology/Innovation",
            SectionTitle::CompetitiveAnalysis => "Competitive Analysis",
            SectionTitle::TractionValidation => "Traction and Validation",
            SectionTitle::TeamLeadership => "Team and Leadership",
            SectionTitle::FinancialInformation => "Financial Information",
            SectionTitle::DevelopmentExecution => "Development and Execution",
            SectionTitle::LegalCompliance => "Legal and Compliance",
            SectionTitle::ImpactInnovation => "Impact and Innovation",
            SectionTitle::AdditionalSupportingInformation => "Additional Supporting Information",
            SectionTitle::Others => "Others",
        }
    }

    /// Exact-match parse against the canonical strings.
    ///
    /// Anything else yields `None`; callers that consume model output treat
    /// unrecognized tokens as noise, not as errors.
    pub fn parse(s: &str) -> Option<SectionTitle> {
        SectionTitle::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for SectionTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An un-embedded section produced by the enhancement stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SectionDraft {
    pub title: SectionTitle,
    pub summary: String,
    pub notes: String,
    pub analysis: String,
    pub actionable_gap_analysis: String,
}

impl SectionDraft {
    /// Text that gets embedded at ingestion time.
    ///
    /// Same rendering the answer prompt consumes, so the query-side
    /// composite search text and the index share vocabulary.
    pub fn embedding_text(&self) -> String {
        render_section(&self.title, &self.summary, &self.notes, &self.analysis)
    }
}

/// One indexed unit of an innovator's profile, as returned by retrieval.
#[derive(Clone, Debug)]
pub struct ProfileSection {
    pub title: SectionTitle,
    pub summary: String,
    pub notes: String,
    pub analysis: String,
    pub actionable_gap_analysis: String,
    /// Stored embedding (kept for potential re-ranking).
    pub vector: Vec<f32>,
    /// Similarity score when the section came from a vector search.
    pub score: Option<f32>,
}

impl ProfileSection {
    /// Reconstructs a section from a Qdrant payload.
    ///
    /// Returns `None` if the payload lacks a valid canonical title; such
    /// points are skipped (and logged) rather than failing retrieval.
    pub fn from_payload(payload: &Value, vector: Vec<f32>, score: Option<f32>) -> Option<Self> {
        let title = SectionTitle::parse(payload.get("title")?.as_str()?)?;
        let text = |key: &str| {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            title,
            summary: text("summary"),
            notes: text("notes"),
            analysis: text("analysis"),
            actionable_gap_analysis: text("actionable_gap_analysis"),
            vector,
            score,
        })
    }

    /// Prompt-facing rendering of the section.
    pub fn render(&self) -> String {
        render_section(&self.title, &self.summary, &self.notes, &self.analysis)
    }
}

fn render_section(title: &SectionTitle, summary: &str, notes: &str, analysis: &str) -> String {
    format!("### {title}\n**Summary:**\n{summary}\n**Notes:**\n{notes}\n**Analysis:**\n{analysis}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_accepts_exact_canonical_titles_only() {
        assert_eq!(
            SectionTitle::parse("The Business Model"),
            Some(SectionTitle::BusinessModel)
        );
        assert_eq!(SectionTitle::parse("the business model"), None);
        assert_eq!(SectionTitle::parse("Business Model"), None);
    }

    #[test]
    fn serde_round_trips_through_canonical_strings() {
        let s = serde_json::to_string(&SectionTitle::GoToMarket).unwrap();
        assert_eq!(s, "\"Go-to-Market Strategy\"");
        let back: SectionTitle = serde_json::from_str(&s).unwrap();
        assert_eq!(back, SectionTitle::GoToMarket);
    }

    #[test]
    fn from_payload_requires_canonical_title() {
        let good = json!({
            "title": "Introduction",
            "summary": "Acme builds rockets.",
            "notes": "n",
            "analysis": "a",
            "actionable_gap_analysis": "g",
        });
        let section = ProfileSection::from_payload(&good, vec![0.1], Some(0.9)).unwrap();
        assert_eq!(section.title, SectionTitle::Introduction);
        assert_eq!(section.score, Some(0.9));

        let bad = json!({ "title": "Rockets", "summary": "s" });
        assert!(ProfileSection::from_payload(&bad, vec![], None).is_none());
    }

    #[test]
    fn render_labels_all_parts() {
        let s = ProfileSection {
            title: SectionTitle::Problem,
            summary: "s".into(),
            notes: "n".into(),
            analysis: "a".into(),
            actionable_gap_analysis: "g".into(),
            vector: vec![],
            score: None,
        };
        let text = s.render();
        assert!(text.starts_with("### The Problem"));
        assert!(text.contains("**Summary:**\ns"));
        assert!(text.contains("**Notes:**\nn"));
        assert!(text.contains("**Analysis:**\na"));
    }
}
