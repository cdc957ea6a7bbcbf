//! Static keyword taxonomy and the pure title matcher.
//!
//! Two independent routes contribute candidate titles:
//! - taxonomy categories: any keyword appearing as a substring of the
//!   question text pulls in that category's mapped section titles;
//! - section descriptions: any whitespace-split word of a description
//!   appearing in the question text pulls in that section title.
//!
//! Pure, deterministic, no I/O, no failure mode.

use profile_store::SectionTitle;
use std::collections::BTreeSet;

/// Keyword taxonomy: domain category → search terms.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "TEAM_LEADERSHIP",
        &[
            "founder", "team", "leadership", "expertise", "advisory board",
            "organizational structure", "academic affiliations", "key team members",
            "management", "experience", "background", "skills", "research affiliations",
            "board members", "executives", "directors", "advisors", "professors",
        ],
    ),
    (
        "COMPANY_FUNDAMENTALS",
        &[
            "company", "registration", "history", "mission", "vision",
            "location", "headquarters", "incorporation", "company profile",
            "business description", "founding date", "company timeline",
            "physical location", "branch offices", "corporate identity",
            "business registration", "company structure",
        ],
    ),
    (
        "PRODUCT_TECHNOLOGY",
        &[
            "technology", "product", "service", "development stage",
            "technical architecture", "unique selling proposition", "IP",
            "innovation", "features", "specifications", "technical details",
            "product roadmap", "technology stack", "core technology",
            "product pipeline", "R&D", "intellectual property", "patents",
            "technical capabilities", "product differentiation",
        ],
    ),
    (
        "MARKET_ANALYSIS",
        &[
            "market size", "TAM", "SAM", "SOM", "target market",
            "market segments", "competition", "competitive landscape",
            "market trends", "industry analysis", "market dynamics",
            "entry barriers", "geographic focus", "market opportunity",
            "market research", "industry trends", "market validation",
            "competitor analysis", "market penetration",
        ],
    ),
    (
        "BUSINESS_MODEL",
        &[
            "revenue streams", "pricing strategy", "distribution channels",
            "customer acquisition", "partnership strategy", "cost structure",
            "business strategy", "go-to-market", "sales channels",
            "revenue model", "monetization", "pricing model",
            "distribution strategy", "sales strategy", "partnerships",
            "business operations", "operational model",
        ],
    ),
    (
        "TRACTION_VALIDATION",
        &[
            "customers", "users", "pilot programs", "letters of intent",
            "partnerships", "market validation", "revenue metrics",
            "user growth", "customer testimonials", "case studies",
            "proof of concept", "pilot results", "early adopters",
            "customer feedback", "market traction", "validation results",
            "success stories", "client portfolio",
        ],
    ),
    (
        "FINANCIAL_INFORMATION",
        &[
            "funding requirements", "use of funds", "financial projections",
            "runway", "funding rounds", "financial metrics", "revenue",
            "costs", "burn rate", "cash flow", "balance sheet",
            "income statement", "financial model", "investment needs",
            "funding history", "valuation", "cap table", "financial planning",
        ],
    ),
    (
        "DEVELOPMENT_EXECUTION",
        &[
            "product roadmap", "R&D milestones", "go-to-market strategy",
            "scaling plans", "risk mitigation", "development timeline",
            "execution strategy", "growth strategy", "expansion plans",
            "operational roadmap", "development phases", "milestone planning",
            "risk assessment", "strategic planning", "implementation plan",
        ],
    ),
    (
        "LEGAL_COMPLIANCE",
        &[
            "IP rights", "patents", "regulatory requirements", "compliance",
            "legal structure", "licensing", "agreements", "contracts",
            "regulatory approvals", "certifications", "legal documentation",
            "compliance requirements", "regulatory framework", "legal status",
            "intellectual property rights", "trademark", "copyright",
        ],
    ),
    (
        "IMPACT_INNOVATION",
        &[
            "social impact", "environmental impact", "innovation",
            "technology advantages", "industry contribution", "sustainability",
            "social responsibility", "environmental benefits", "SDGs",
            "innovation metrics", "impact measurement", "social value",
            "environmental sustainability", "innovation framework",
        ],
    ),
];

/// Taxonomy category → relevant section titles.
pub fn titles_for_category(category: &str) -> &'static [SectionTitle] {
    match category {
        "TEAM_LEADERSHIP" => &[SectionTitle::TeamLeadership],
        "COMPANY_FUNDAMENTALS" => &[SectionTitle::Introduction, SectionTitle::Others],
        "PRODUCT_TECHNOLOGY" => &[
            SectionTitle::Solution,
            SectionTitle::TechnologyInnovation,
        ],
        "MARKET_ANALYSIS" => &[
            SectionTitle::MarketOpportunity,
            SectionTitle::CompetitiveAnalysis,
        ],
        "BUSINESS_MODEL" => &[SectionTitle::BusinessModel],
        "TRACTION_VALIDATION" => &[SectionTitle::TractionValidation],
        "FINANCIAL_INFORMATION" => &[SectionTitle::FinancialInformation],
        "DEVELOPMENT_EXECUTION" => &[SectionTitle::DevelopmentExecution],
        "LEGAL_COMPLIANCE" => &[SectionTitle::LegalCompliance],
        "IMPACT_INNOVATION" => &[SectionTitle::ImpactInnovation],
        _ => &[],
    }
}

/// Canonical section → one-line description, used both by the matcher and
/// by the enhancement-report framework.
pub const SECTION_INFO: &[(SectionTitle, &str)] = &[
    (
        SectionTitle::Introduction,
        "Who is presenting, the company name, and a concise overview of the idea or value proposition.",
    ),
    (
        SectionTitle::Problem,
        "Articulate the specific pain point or challenge the startup aims to solve, with evidence or context if available.",
    ),
    (
        SectionTitle::Need,
        "Highlight the unmet customer needs or gaps in the market that justify the solution.",
    ),
    (
        SectionTitle::Solution,
        "Detail the solution, emphasizing its unique selling propositions (USPs) and competitive advantages.",
    ),
    (
        SectionTitle::BusinessModel,
        "Describe the revenue streams, pricing strategy, customer acquisition channels, and overall business strategy.",
    ),
    (
        SectionTitle::GoToMarket,
        "Explain the approach for market entry, customer engagement, and scaling.",
    ),
    (
        SectionTitle::MarketOpportunity,
        "Summarize the target market, including total addressable market (TAM), serviceable addressable market (SAM), market growth potential, and industry trends.",
    ),
    (
        SectionTitle::TechnologyInnovation,
        "Provide insights into the underlying technology, product features, technical architecture, or innovative aspects of the solution.",
    ),
    (
        SectionTitle::CompetitiveAnalysis,
        "Compare with competitors, addressing differentiators, competitive landscape, and barriers to entry.",
    ),
    (
        SectionTitle::TractionValidation,
        "Include existing metrics, milestones, customer testimonials, pilot programs, or validation efforts.",
    ),
    (
        SectionTitle::TeamLeadership,
        "Evaluate the team's qualifications, expertise, organizational structure, and any notable advisors or affiliations.",
    ),
    (
        SectionTitle::FinancialInformation,
        "Cover funding requirements, revenue forecasts, financial health, use of funds, and return on investment (ROI).",
    ),
    (
        SectionTitle::DevelopmentExecution,
        "Outline the product roadmap, scaling strategy, risk management, and execution plan.",
    ),
    (
        SectionTitle::LegalCompliance,
        "Note IP rights, regulatory requirements, certifications, and any legal aspects.",
    ),
    (
        SectionTitle::ImpactInnovation,
        "Discuss social, environmental, or economic impacts, sustainability, and contributions to innovation.",
    ),
    (
        SectionTitle::AdditionalSupportingInformation,
        "Include insights from supplementary materials like pitch decks, business plans, technical documents, or financial models.",
    ),
];

/// Maps raw question text to candidate section titles.
///
/// `text` is the concatenation of the question's category, title, and body;
/// matching is case-insensitive substring containment. The returned set may
/// be empty — the caller decides on a fallback.
pub fn match_titles(text: &str) -> BTreeSet<SectionTitle> {
    let haystack = text.to_lowercase();
    let mut titles = BTreeSet::new();

    for (category, terms) in TAXONOMY {
        if terms.iter().any(|t| haystack.contains(&t.to_lowercase())) {
            titles.extend(titles_for_category(category).iter().copied());
        }
    }

    for (title, description) in SECTION_INFO {
        let described = description
            .to_lowercase()
            .split_whitespace()
            .any(|word| haystack.contains(word));
        if described {
            titles.insert(*title);
        }
    }

    titles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matcher_is_deterministic() {
        let text = "Business | Revenue | Describe your revenue model";
        let a = match_titles(text);
        let b = match_titles(text);
        assert_eq!(a, b);
    }

    #[test]
    fn revenue_question_maps_to_business_model() {
        let titles = match_titles("Business | Revenue | Describe your revenue model");
        assert!(titles.contains(&SectionTitle::BusinessModel));
    }

    #[test]
    fn team_question_maps_to_team_leadership() {
        let titles = match_titles("Team | Founders | Who are the founders of the company?");
        assert!(titles.contains(&SectionTitle::TeamLeadership));
    }

    #[test]
    fn unrelated_text_can_match_nothing() {
        let titles = match_titles("zzzz qqqq");
        assert!(titles.is_empty());
    }

    #[test]
    fn every_taxonomy_category_has_a_title_mapping() {
        for (category, _) in TAXONOMY {
            assert!(
                !titles_for_category(category).is_empty(),
                "unmapped category {category}"
            );
        }
    }
}
