//! Versioned prompt templates
//!
//! Templates are embedded at compile time. Each carries a name and version
//! that are recorded with every generative-text run, and a content hash so a
//! run can be traced back to the exact template text.

use deal_types::hash_text;

/// Extraction prompt - loaded from prompts/extract_terms_v1.txt
const EXTRACT_TERMS_V1_BODY: &str = include_str!("../prompts/extract_terms_v1.txt");

/// IC draft prompt - loaded from prompts/ic_draft_v1.txt
const IC_DRAFT_V1_BODY: &str = include_str!("../prompts/ic_draft_v1.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub version: &'static str,
    pub body: &'static str,
}

/// Pulls loan terms out of combined document text. Placeholder: `{deal_text}`
pub const EXTRACT_TERMS_V1: PromptTemplate = PromptTemplate {
    name: "extract_terms",
    version: "v1",
    body: EXTRACT_TERMS_V1_BODY,
};

/// Drafts the IC memo from terms and analysis. Placeholder: `{input_json}`
pub const IC_DRAFT_V1: PromptTemplate = PromptTemplate {
    name: "ic_draft",
    version: "v1",
    body: IC_DRAFT_V1_BODY,
};

impl PromptTemplate {
    /// `name:version`, as recorded in audit details
    pub fn id(&self) -> String {
        format!("{}:{}", self.name, self.version)
    }

    /// Substitute `{key}` placeholders. Unknown placeholders are left as-is.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        vars.iter()
            .fold(self.body.to_string(), |text, (key, value)| {
                text.replace(&format!("{{{}}}", key), value)
            })
    }

    /// Hex SHA-256 of the template body
    pub fn content_hash(&self) -> String {
        hash_text(self.body)
    }
}

/// Look up an embedded template by name and version
pub fn get_template(name: &str, version: &str) -> Option<PromptTemplate> {
    [EXTRACT_TERMS_V1, IC_DRAFT_V1]
        .into_iter()
        .find(|t| t.name == name && t.version == version)
}
