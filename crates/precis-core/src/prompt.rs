use crate::types::SummaryStyle;

pub const SYSTEM_PROMPT: &str = "You are a professional text summarizer. Provide accurate, concise, and well-structured summaries.";

pub const VALIDATION_PROMPT: &str = "Hello, please respond with 'API key is working'";

const UNWANTED_PREFIXES: [&str; 4] = [
    "SUMMARY:",
    "Summary:",
    "Here is the summary:",
    "Here's the summary:",
];

pub fn style_instruction(style: SummaryStyle) -> &'static str {
    match style {
        SummaryStyle::Brief => {
            "Create a concise, brief summary that captures only the most essential points."
        }
        SummaryStyle::Detailed => {
            "Create a comprehensive summary that covers all important points and key details."
        }
        SummaryStyle::BulletPoints => {
            "Create a summary in bullet point format, highlighting key points clearly."
        }
    }
}

pub fn build_prompt(text: &str, style: SummaryStyle, max_words: u32, language: &str) -> String {
    let instruction = style_instruction(style);
    format!(
        "You are an expert text summarizer. Your task is to create a high-quality summary of the provided text.

INSTRUCTIONS:
- {instruction}
- Maximum length: approximately {max_words} words
- Output language: {language}
- Maintain the original meaning and context
- Use clear, professional language
- Focus on key facts, main ideas, and important details
- Do not add information not present in the original text

TEXT TO SUMMARIZE:
{text}

SUMMARY:
"
    )
}

/// Trim a model reply and drop one leading label such as `Summary:`.
pub fn strip_known_prefix(response: &str) -> &str {
    let trimmed = response.trim();
    UNWANTED_PREFIXES
        .iter()
        .find_map(|prefix| trimmed.strip_prefix(prefix))
        .map(str::trim)
        .unwrap_or(trimmed)
}
