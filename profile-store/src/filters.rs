//! Filter conversion to Qdrant `Filter`.
//!
//! The profile schema needs conjunctive filtering: always on `entity_id`
//! (keyword equality), optionally on a set of canonical titles (match-any).

use crate::section::SectionTitle;
use qdrant_client::qdrant::{
    condition::ConditionOneOf, r#match::MatchValue, Condition, FieldCondition, Filter, Match,
    RepeatedStrings,
};
use tracing::debug;

/// Filter over indexed profile sections.
#[derive(Clone, Debug)]
pub struct SectionFilter {
    /// Entity whose profile is being queried. Mandatory: entities are the
    /// unit of isolation for all indexed content.
    pub entity_id: String,
    /// Optional restriction to a candidate title set.
    pub titles: Option<Vec<SectionTitle>>,
}

impl SectionFilter {
    pub fn entity(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            titles: None,
        }
    }

    pub fn with_titles(mut self, titles: Vec<SectionTitle>) -> Self {
        self.titles = Some(titles);
        self
    }
}

/// Converts a [`SectionFilter`] into a conjunctive Qdrant [`Filter`].
pub fn to_qdrant_filter(f: &SectionFilter) -> Filter {
    debug!(
        "filters::to_qdrant_filter entity_id={} titles={}",
        f.entity_id,
        f.titles.as_ref().map(|t| t.len()).unwrap_or(0)
    );

    let mut must: Vec<Condition> = Vec::with_capacity(2);

    must.push(field_condition(
        "entity_id",
        MatchValue::Keyword(f.entity_id.clone()),
    ));

    if let Some(titles) = &f.titles {
        if !titles.is_empty() {
            must.push(field_condition(
                "title",
                MatchValue::Keywords(RepeatedStrings {
                    strings: titles.iter().map(|t| t.as_str().to_string()).collect(),
                }),
            ));
        }
    }

    Filter {
        must,
        ..Default::default()
    }
}

fn field_condition(key: &str, match_value: MatchValue) -> Condition {
    Condition {
        condition_one_of: Some(ConditionOneOf::Field(FieldCondition {
            key: key.to_string(),
            r#match: Some(Match {
                match_value: Some(match_value),
            }),
            ..Default::default()
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_only_filter_has_single_must_condition() {
        let f = to_qdrant_filter(&SectionFilter::entity("e-1"));
        assert_eq!(f.must.len(), 1);
        assert!(f.should.is_empty());
    }

    #[test]
    fn title_set_adds_match_any_condition() {
        let f = to_qdrant_filter(
            &SectionFilter::entity("e-1")
                .with_titles(vec![SectionTitle::BusinessModel, SectionTitle::Others]),
        );
        assert_eq!(f.must.len(), 2);
    }

    #[test]
    fn empty_title_set_is_ignored() {
        let f = to_qdrant_filter(&SectionFilter::entity("e-1").with_titles(vec![]));
        assert_eq!(f.must.len(), 1);
    }
}
