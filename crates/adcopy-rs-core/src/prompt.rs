//! Ad brief model and the fixed prompt template.

use crate::error::GenerationError;
use adcopy_rs_config::DEFAULT_SYSTEM_PROMPT;
use adcopy_rs_store::DEFAULT_TONE;
use serde::{Deserialize, Serialize};

/// Largest number of variants a single brief may request.
pub const MAX_VARIANTS: u8 = 10;

/// What the caller wants an ad for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdBrief {
    /// Product or service being advertised.
    #[serde(default, alias = "service")]
    pub product: String,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub target_city: Option<String>,
    #[serde(default)]
    pub min_project_budget: Option<u64>,
    #[serde(default = "default_call_to_action")]
    pub call_to_action: String,
    #[serde(default = "default_variants")]
    pub variants: u8,
    #[serde(default = "default_hashtags")]
    pub hashtags: bool,
}

fn default_call_to_action() -> String {
    "Contact us today!".to_string()
}

fn default_variants() -> u8 {
    3
}

fn default_hashtags() -> bool {
    true
}

impl AdBrief {
    /// Brief with only a product and tone; everything else defaulted.
    pub fn new(product: impl Into<String>, tone: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            tone: Some(tone.into()),
            target_city: None,
            min_project_budget: None,
            call_to_action: default_call_to_action(),
            variants: default_variants(),
            hashtags: default_hashtags(),
        }
    }

    /// Product name exactly as supplied.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// Requested tone as supplied, or `"friendly"` when absent or blank.
    pub fn tone(&self) -> &str {
        self.tone
            .as_deref()
            .filter(|tone| !tone.trim().is_empty())
            .unwrap_or(DEFAULT_TONE)
    }

    /// Reject briefs that must not reach the provider.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.product.trim().is_empty() {
            return Err(GenerationError::InvalidArgument(
                "product must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_VARIANTS).contains(&self.variants) {
            return Err(GenerationError::InvalidArgument(format!(
                "variants must be between 1 and {MAX_VARIANTS} (got {})",
                self.variants
            )));
        }
        Ok(())
    }
}

/// Renders briefs into provider prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    system_prompt: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}

impl PromptTemplate {
    /// Template with a custom system prompt; blank prompts are omitted.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
        }
    }

    /// System prompt to send, if any.
    pub fn system_prompt(&self) -> Option<String> {
        let prompt = self.system_prompt.trim();
        (!prompt.is_empty()).then(|| prompt.to_string())
    }

    /// User prompt for a brief.
    pub fn user_prompt(&self, brief: &AdBrief) -> String {
        let mut opening = format!(
            "Generate {} distinct ad variants for {}",
            brief.variants,
            brief.product().trim()
        );
        if let Some(city) = brief
            .target_city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
        {
            opening.push_str(&format!(" in {city}"));
        }
        opening.push('.');

        let mut parts = vec![opening, format!("Tone: {}.", brief.tone().trim())];
        if let Some(budget) = brief.min_project_budget {
            parts.push(format!("Minimum project budget implied: ${budget}+."));
        }
        let call_to_action = brief.call_to_action.trim();
        if !call_to_action.is_empty() {
            let stop = if call_to_action.ends_with(['.', '!', '?']) {
                ""
            } else {
                "."
            };
            parts.push(format!("Call to action: {call_to_action}{stop}"));
        }
        parts.push(if brief.hashtags {
            "Include tasteful hashtags.".to_string()
        } else {
            "Do not include hashtags.".to_string()
        });
        parts.push("Return as numbered bullets.".to_string());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::{AdBrief, PromptTemplate};
    use crate::GenerationError;
    use pretty_assertions::assert_eq;

    #[test]
    fn brief_defaults_match_wire_defaults() {
        let brief: AdBrief = serde_json::from_str(r#"{"service":"Kitchen remodels"}"#).expect("brief");
        assert_eq!(brief.product(), "Kitchen remodels");
        assert_eq!(brief.tone(), "friendly");
        assert_eq!(brief.variants, 3);
        assert!(brief.hashtags);
        assert_eq!(brief.call_to_action, "Contact us today!");
    }

    #[test]
    fn blank_tone_falls_back_to_friendly() {
        assert_eq!(AdBrief::new("ProconAI", "  ").tone(), "friendly");
        assert_eq!(AdBrief::new("ProconAI", " bold ").tone(), " bold ");
    }

    #[test]
    fn validate_rejects_empty_product_and_bad_variant_counts() {
        let err = AdBrief::new("   ", "friendly").validate().unwrap_err();
        assert!(matches!(err, GenerationError::InvalidArgument(_)));

        let mut brief = AdBrief::new("ProconAI", "friendly");
        brief.variants = 0;
        assert!(brief.validate().is_err());
        brief.variants = 11;
        assert!(brief.validate().is_err());
        brief.variants = 10;
        assert!(brief.validate().is_ok());
    }

    #[test]
    fn user_prompt_includes_every_supplied_detail() {
        let brief = AdBrief {
            target_city: Some("Bonita Springs, FL".to_string()),
            min_project_budget: Some(75_000),
            ..AdBrief::new("kitchen remodels", "upscale")
        };
        let prompt = PromptTemplate::default().user_prompt(&brief);
        assert_eq!(
            prompt,
            "Generate 3 distinct ad variants for kitchen remodels in Bonita Springs, FL. \
             Tone: upscale. Minimum project budget implied: $75000+. \
             Call to action: Contact us today! Include tasteful hashtags. \
             Return as numbered bullets."
        );
    }

    #[test]
    fn user_prompt_skips_absent_details() {
        let brief = AdBrief {
            hashtags: false,
            call_to_action: String::new(),
            ..AdBrief::new("ProconAI", "confident")
        };
        let prompt = PromptTemplate::default().user_prompt(&brief);
        assert_eq!(
            prompt,
            "Generate 3 distinct ad variants for ProconAI. Tone: confident. \
             Do not include hashtags. Return as numbered bullets."
        );
    }

    #[test]
    fn brief_keeps_caller_strings_but_prompt_is_trimmed() {
        let brief = AdBrief::new("  ProconAI ", " confident");
        assert_eq!(brief.product(), "  ProconAI ");
        assert_eq!(brief.tone(), " confident");
        let prompt = PromptTemplate::default().user_prompt(&brief);
        assert!(prompt.starts_with("Generate 3 distinct ad variants for ProconAI. Tone: confident."));
    }

    #[test]
    fn blank_system_prompt_is_omitted() {
        assert_eq!(PromptTemplate::new("  ").system_prompt(), None);
        assert!(PromptTemplate::default().system_prompt().is_some());
    }
}
