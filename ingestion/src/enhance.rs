//! Content enhancement: raw collected material into profile sections.
//!
//! A single due-diligence prompt asks the model for a structured report
//! with one `h2` section per canonical profile category, each split into
//! `h3` parts (Summary, Notes, Detailed Analysis, Actionable Gap
//! Analysis). The report parser turns that markdown into section drafts.

use crate::collect::{CollectedData, FILE_KEYS};
use crate::error::IngestError;
use grant_answering::TAXONOMY;
use llm_service::CompletionProvider;
use profile_store::{SectionDraft, SectionTitle};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;
use tracing::{debug, warn};

const REPORT_PROMPT_TEMPLATE: &str = r#"You are a Domain expert specializing in startup due diligence, with proficiency in analyzing startup pitches and structuring comprehensive, detailed reports. Your task is to evaluate the provided startup pitch and supplementary materials to produce a thorough due diligence report. The report should be organized into clearly labeled sections, following the framework outlined below. For each section, analyze the information provided, identify gaps, and suggest actionable improvements or clarifications where needed. Use bullet points for clarity and provide concise yet detailed explanations.

**Key Instructions:**
1. Address every section of the report, even if the pitch lacks sufficient information for certain aspects. Explicitly note missing details, propose relevant questions to fill gaps, and suggest enhancements to strengthen the pitch.
2. Tailor your analysis to reflect domain-specific terminology and concepts, ensuring relevance for investors, advisors, or stakeholders conducting due diligence.
3. Use the embedded taxonomy (below) to ensure all critical aspects of startup due diligence are covered comprehensively.
4. Maintain a professional tone suitable for decision-makers, ensuring clarity, precision, and a logical structure.
5. **In each section write a detailed analysis. The structure is a summary, bullet points, and a 3 paragraph detailed analysis.**

**Report Framework** (sections):
{framework}

**Taxonomy**:

Use the following categories to enrich your analysis in each section:

{taxonomy}

**Actionable Gap Analysis**:
For every missing or incomplete section, explicitly note the gap and suggest detailed, practical improvements or follow-up questions.

**Input**: {files_content}
**Output**: A structured due diligence report covering all aspects above, with detailed and actionable insights.

**Format**:
- Start each section with a summary.
- Follow with subpoints or bullet points detailing the analysis.
- Have a 3 paragraph detailed analysis of the section.
- Clearly separate actionable suggestions or notes for missing details.
- Use `h2` markdown headers for section titles, with the exact section titles given in the framework.
- Use the exact titles "Summary", "Notes", "Detailed Analysis", "Actionable Gap Analysis" in this exact order for the parts of each section.
- Each part's title should be in an `h3` markdown header.

Deliver a polished, investor-ready report that captures all essential dimensions of due diligence."#;

/// Builds the due-diligence report prompt from the extracted file texts.
pub fn build_report_prompt(file_contents: &BTreeMap<String, String>) -> String {
    let mut framework = String::new();
    for (index, (title, description)) in grant_answering::SECTION_INFO.iter().enumerate() {
        let _ = writeln!(
            framework,
            "{}. **{}**: {}",
            index + 1,
            title.as_str(),
            description
        );
    }

    let mut taxonomy = String::new();
    for (category, keywords) in TAXONOMY {
        let _ = writeln!(taxonomy, "- {}: {}", category, keywords.join(", "));
    }

    let mut files = String::new();
    for (filename, text) in file_contents {
        let _ = write!(files, "\n--- {filename} ---\n{text}\n");
    }

    REPORT_PROMPT_TEMPLATE
        .replace("{framework}", framework.trim_end())
        .replace("{taxonomy}", taxonomy.trim_end())
        .replace("{files_content}", &files)
}

/// Strips list numbering and emphasis from a report section heading,
/// e.g. `3. **The Need**` → `The Need`.
fn clean_heading(line: &str) -> &str {
    let line = line.trim();
    let line = line
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
        .trim_start();
    line.trim_matches('*').trim()
}

/// Parses the generated markdown report into section drafts.
///
/// Sections whose heading is not a canonical title are skipped with a
/// warning; a report with no recognizable sections is an error.
pub fn parse_report(markdown: &str) -> Result<Vec<SectionDraft>, IngestError> {
    let mut drafts = Vec::new();

    // Leading newline so a report that opens directly with `## ` still
    // splits on the first heading.
    let markdown = format!("\n{markdown}");
    for block in markdown.split("\n## ").skip(1) {
        let (heading, body) = block.split_once('\n').unwrap_or((block, ""));
        let Some(title) = SectionTitle::parse(clean_heading(heading)) else {
            warn!(heading = heading.trim(), "unrecognized report section, skipping");
            continue;
        };

        let mut draft = SectionDraft {
            title,
            summary: String::new(),
            notes: String::new(),
            analysis: String::new(),
            actionable_gap_analysis: String::new(),
        };

        for part in body.split("\n### ").skip(if body.starts_with("### ") { 0 } else { 1 }) {
            let part = part.trim_start_matches("### ");
            let (part_heading, part_body) = part.split_once('\n').unwrap_or((part, ""));
            let text = part_body.trim().to_string();
            match clean_heading(part_heading) {
                "Summary" => draft.summary = text,
                "Notes" => draft.notes = text,
                "Detailed Analysis" => draft.analysis = text,
                "Actionable Gap Analysis" => draft.actionable_gap_analysis = text,
                other => {
                    warn!(part = other, "unrecognized report part, skipping");
                }
            }
        }
        drafts.push(draft);
    }

    if drafts.is_empty() {
        return Err(IngestError::Report(
            "no recognizable sections in generated report".into(),
        ));
    }
    Ok(drafts)
}

/// Recursively removes file-reference nodes from a nested structure.
/// Empty containers collapse to `None`.
pub fn remove_file_data(data: &Value) -> Option<Value> {
    match data {
        Value::Object(map) => {
            if FILE_KEYS.iter().any(|key| map.contains_key(*key)) {
                return None;
            }
            let cleaned: serde_json::Map<String, Value> = map
                .iter()
                .filter_map(|(k, v)| remove_file_data(v).map(|v| (k.clone(), v)))
                .collect();
            (!cleaned.is_empty()).then_some(Value::Object(cleaned))
        }
        Value::Array(items) => {
            let cleaned: Vec<Value> = items.iter().filter_map(remove_file_data).collect();
            (!cleaned.is_empty()).then_some(Value::Array(cleaned))
        }
        other => Some(other.clone()),
    }
}

/// Output of the enhancement stage.
#[derive(Clone, Debug)]
pub struct EnhancedContent {
    /// Form answers with file nodes removed.
    pub basic_info: Value,
    pub sections: Vec<SectionDraft>,
}

/// Turns collected raw material into an enhanced profile.
pub struct ContentEnhancer {
    llm: Arc<dyn CompletionProvider>,
}

impl ContentEnhancer {
    pub fn new(llm: Arc<dyn CompletionProvider>) -> Self {
        Self { llm }
    }

    fn basic_info(collected: &CollectedData) -> Value {
        collected
            .form_data
            .first()
            .and_then(|submission| submission.get("data"))
            .and_then(remove_file_data)
            .unwrap_or(Value::Null)
    }

    pub async fn process(&self, collected: &CollectedData) -> Result<EnhancedContent, IngestError> {
        let basic_info = Self::basic_info(collected);
        let prompt = build_report_prompt(&collected.file_contents);
        let report = self.llm.complete(&prompt).await?;
        let sections = parse_report(&report)?;
        debug!(sections = sections.len(), "content enhanced");
        Ok(EnhancedContent {
            basic_info,
            sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const REPORT: &str = "Preamble the model added.\n\
## Introduction\n\
### Summary\nAcme builds widget automation.\n\
### Notes\n- Founded 2024\n\
### Detailed Analysis\nLong analysis here.\n\
### Actionable Gap Analysis\nMissing incorporation date.\n\
## 4. **The Solution**\n\
### Summary\nRobotic widget assembly.\n\
### Notes\n- Patent pending\n\
### Detailed Analysis\nDeep dive.\n\
### Actionable Gap Analysis\nNone noted.\n\
## Imaginary Section\n\
### Summary\nShould be skipped.\n";

    #[test]
    fn parses_sections_and_parts() {
        let drafts = parse_report(REPORT).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, SectionTitle::Introduction);
        assert_eq!(drafts[0].summary, "Acme builds widget automation.");
        assert_eq!(drafts[0].actionable_gap_analysis, "Missing incorporation date.");
        assert_eq!(drafts[1].title, SectionTitle::Solution);
        assert_eq!(drafts[1].notes, "- Patent pending");
    }

    #[test]
    fn numbered_bold_headings_are_recognized() {
        assert_eq!(clean_heading("4. **The Solution**"), "The Solution");
        assert_eq!(clean_heading("Introduction"), "Introduction");
    }

    #[test]
    fn report_without_sections_is_an_error() {
        assert!(parse_report("The model refused to answer.").is_err());
    }

    #[test]
    fn removes_file_nodes_recursively() {
        let data = json!({
            "company": "Acme",
            "pitch": {"filename": "deck.pdf", "url": "http://x"},
            "answers": [{"q": "a"}, {"relativePath": "uploads/x.txt"}]
        });
        let cleaned = remove_file_data(&data).unwrap();
        assert_eq!(cleaned["company"], "Acme");
        assert!(cleaned.get("pitch").is_none());
        assert_eq!(cleaned["answers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn all_file_data_collapses_to_none() {
        let data = json!({"pitch": {"filename": "deck.pdf"}});
        assert!(remove_file_data(&data).is_none());
    }

    #[test]
    fn prompt_embeds_framework_taxonomy_and_files() {
        let mut files = BTreeMap::new();
        files.insert("deck.pdf".to_string(), "We automate widgets.".to_string());
        let prompt = build_report_prompt(&files);
        assert!(prompt.contains("16. **Additional Supporting Information**"));
        assert!(prompt.contains("- BUSINESS_MODEL:"));
        assert!(prompt.contains("--- deck.pdf ---"));
        assert!(!prompt.contains("{taxonomy}"));
    }
}
