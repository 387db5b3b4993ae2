//! Prompt template types.

use serde::{Deserialize, Serialize};

use crate::mode::Mode;

/// A pre-written prompt skeleton. Bracketed placeholders such as
/// `[Company]` are filled in by the user before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub mode: Mode,
    pub prompt: String,
}

impl PromptTemplate {
    /// Case-insensitive match of `needle` against title or description.
    /// An empty needle matches everything.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Placeholders (`[...]` segments) still present in the prompt
    pub fn placeholders(&self) -> Vec<&str> {
        let mut found = Vec::new();
        let mut rest = self.prompt.as_str();
        while let Some(start) = rest.find('[') {
            let after = &rest[start + 1..];
            match after.find(']') {
                Some(end) => {
                    found.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        found
    }
}

/// Picker tab: every template, or only those of one mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemplateFilter {
    #[default]
    All,
    Mode(Mode),
}

impl TemplateFilter {
    /// Tabs in picker order
    pub fn all() -> [TemplateFilter; 4] {
        [
            TemplateFilter::All,
            TemplateFilter::Mode(Mode::BusinessAgent),
            TemplateFilter::Mode(Mode::ShortPrompt),
            TemplateFilter::Mode(Mode::AdvancedPrompt),
        ]
    }

    pub fn accepts(&self, mode: Mode) -> bool {
        match self {
            TemplateFilter::All => true,
            TemplateFilter::Mode(m) => *m == mode,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TemplateFilter::All => "ALL",
            TemplateFilter::Mode(m) => m.badge(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PromptTemplate {
        PromptTemplate {
            id: "t-1".into(),
            title: "Cold Email Opener".into(),
            description: "First touch for a new lead.".into(),
            category: "Sales".into(),
            mode: Mode::ShortPrompt,
            prompt: "Write an opener for [Company] aimed at [Job Title].".into(),
        }
    }

    #[test]
    fn test_matches_search_is_case_insensitive() {
        let t = sample();
        assert!(t.matches_search("EMAIL"));
        assert!(t.matches_search("new lead"));
        assert!(t.matches_search(""));
        assert!(!t.matches_search("roadmap"));
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(sample().placeholders(), vec!["Company", "Job Title"]);
    }

    #[test]
    fn test_filter_accepts() {
        assert!(TemplateFilter::All.accepts(Mode::AdvancedPrompt));
        assert!(TemplateFilter::Mode(Mode::ShortPrompt).accepts(Mode::ShortPrompt));
        assert!(!TemplateFilter::Mode(Mode::ShortPrompt).accepts(Mode::BusinessAgent));
        assert_eq!(TemplateFilter::all()[0].label(), "ALL");
    }
}
