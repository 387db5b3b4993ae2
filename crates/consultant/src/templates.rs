//! Built-in prompt template catalog and the picker filter.

use shared::{Mode, PromptTemplate, TemplateFilter};
use std::sync::LazyLock;

static BUILTIN: LazyLock<Vec<PromptTemplate>> = LazyLock::new(|| {
    vec![
        template(
            "biz-1",
            "Market Entry Strategy",
            "Framework for entering a new geographic market.",
            "Strategy",
            Mode::BusinessAgent,
            "Conduct a comprehensive market entry analysis for [Product/Service] in [Region]. Include SWOT analysis, competitor landscape, and regulatory considerations.",
        ),
        template(
            "biz-2",
            "Business Model Canvas",
            "Detailed breakdown of a business idea using the canvas framework.",
            "Entrepreneurship",
            Mode::BusinessAgent,
            "Develop a Business Model Canvas for a [Type of Business]. Clearly define value propositions, customer segments, and revenue streams.",
        ),
        template(
            "short-1",
            "Executive Summary",
            "Condense complex text into a brief executive summary.",
            "Productivity",
            Mode::ShortPrompt,
            "Summarize the following business text into a 3-sentence executive summary highlighting the primary value proposition and key metrics: [Insert Text]",
        ),
        template(
            "short-2",
            "Meeting Action Items",
            "Extract clear tasks from raw meeting notes.",
            "Operations",
            Mode::ShortPrompt,
            "Extract all actionable tasks, owners, and deadlines from these meeting notes: [Insert Notes]",
        ),
        template(
            "adv-1",
            "B2B Sales Outreach",
            "Professional email sales sequence with complex constraints.",
            "Sales",
            Mode::AdvancedPrompt,
            "Design a 3-part B2B email sequence for [Company] targeting [Job Title]. Focus on solving [Specific Pain Point] and include clear CTAs.",
        ),
        template(
            "adv-2",
            "Content Strategy Roadmap",
            "Comprehensive content plan for business growth.",
            "Marketing",
            Mode::AdvancedPrompt,
            "Act as a Senior Content Strategist. Develop a 30-day content roadmap for [Company] to increase LinkedIn engagement by 20%.",
        ),
    ]
});

fn template(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    mode: Mode,
    prompt: &str,
) -> PromptTemplate {
    PromptTemplate {
        id: id.into(),
        title: title.into(),
        description: description.into(),
        category: category.into(),
        mode,
        prompt: prompt.into(),
    }
}

/// Read-only template list
#[derive(Debug, Clone, Copy)]
pub struct TemplateCatalog {
    templates: &'static [PromptTemplate],
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN.as_slice(),
        }
    }

    pub fn all(&self) -> &'static [PromptTemplate] {
        self.templates
    }

    pub fn get(&self, id: &str) -> Option<&'static PromptTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&'static str> {
        let mut seen: Vec<&'static str> = Vec::new();
        for t in self.templates {
            if !seen.contains(&t.category.as_str()) {
                seen.push(t.category.as_str());
            }
        }
        seen
    }

    pub fn filter(&self, search: &str, filter: TemplateFilter) -> Vec<&'static PromptTemplate> {
        filter_templates(self.templates, search, filter)
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Templates whose title or description contains `search` (case-insensitive)
/// and whose mode passes `filter`, in catalog order
pub fn filter_templates<'a>(
    templates: &'a [PromptTemplate],
    search: &str,
    filter: TemplateFilter,
) -> Vec<&'a PromptTemplate> {
    templates
        .iter()
        .filter(|t| t.matches_search(search) && filter.accepts(t.mode))
        .collect()
}
