//! LLM prompts for the brand classification exchange.
//!
//! The model only ever sees tag names, never image bytes or asset URLs.

/// Prompt for classifying a brand document against pre-extracted images.
pub const CLASSIFY_BRAND_PROMPT: &str = r##"Analyze the brand document at {pdf_url}.
Reference the pre-extracted images: {available_tags}

INSTRUCTIONS:
- Extract 'brandname', 'tagline', and 'description'.
- COLORS: Identify primary brand colors and return them ONLY as HEX CODES (e.g., #FFFFFF).
- LOGO: Find the single cleanest logo. Once one high-quality logo is detected, move on.
- ASSETS: Categorize remaining tags into 'productimages' or 'bannerimages'.
- If an item is missing, return an empty string "" or empty array [].

RETURN FORMAT:
{
    "brandname": "",
    "colors": ["#HEX1", "#HEX2"],
    "tagline": "",
    "description": "",
    "logo": "tag_id",
    "productimages": ["tag_id"],
    "bannerimages": ["tag_id"]
}"##;

/// Format the classification prompt with the document URL and tag list.
pub fn format_classify_prompt(pdf_url: &str, available_tags: &[String]) -> String {
    let tags_text =
        serde_json::to_string(available_tags).unwrap_or_else(|_| "[]".to_string());
    CLASSIFY_BRAND_PROMPT
        .replace("{pdf_url}", pdf_url)
        .replace("{available_tags}", &tags_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_classify_prompt() {
        let tags = vec!["fig.1".to_string(), "fig.2".to_string()];
        let formatted = format_classify_prompt("https://example.com/brand.pdf", &tags);

        assert!(formatted.contains("https://example.com/brand.pdf"));
        assert!(formatted.contains(r#"["fig.1","fig.2"]"#));
        assert!(formatted.contains("HEX CODES"));
        assert!(!formatted.contains("{pdf_url}"));
        assert!(!formatted.contains("{available_tags}"));
    }

    #[test]
    fn test_format_classify_prompt_no_tags() {
        let formatted = format_classify_prompt("https://example.com/brand.pdf", &[]);
        assert!(formatted.contains("pre-extracted images: []"));
    }
}
