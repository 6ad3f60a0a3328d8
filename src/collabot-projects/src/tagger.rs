//! Keyword auto-tagging.

/// Keyword to tag table. Order matters: a tag is placed where its first
/// matching keyword sits in this table. A keyword may appear more than once
/// when it signals several topics.
pub const TAG_KEYWORDS: &[(&str, &str)] = &[
    ("huggingface", "#NLP"),
    ("transformer", "#NLP"),
    ("nlp", "#NLP"),
    ("chatbot", "#Chatbot"),
    ("gpt", "#Chatbot"),
    ("llm", "#LLM"),
    ("openai", "#LLM"),
    // Deliberate second "gpt" row: a GPT project is tagged #Chatbot and
    // #LLM. Do not drop it.
    ("gpt", "#LLM"),
    ("vision", "#Vision"),
    ("image", "#Vision"),
    ("cnn", "#Vision"),
    ("streamlit", "#DataViz"),
    ("dashboard", "#DataViz"),
    ("pandas", "#DataViz"),
    ("sql", "#Data"),
    ("infra", "#Infra"),
    ("kubernetes", "#Infra"),
    ("api", "#Infra"),
];

/// Derive topic tags from free text.
///
/// Matching is case-insensitive substring containment, so `"rapid"` does
/// trigger `api`. The result has no duplicates.
pub fn auto_tag(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tags: Vec<String> = Vec::new();
    for (keyword, tag) in TAG_KEYWORDS {
        if lowered.contains(keyword) && !tags.iter().any(|t| t == tag) {
            tags.push((*tag).to_string());
        }
    }
    tags
}

/// Append tags from `incoming` that `existing` does not have yet.
pub fn merge_tags(existing: &mut Vec<String>, incoming: impl IntoIterator<Item = String>) {
    for tag in incoming {
        if !existing.contains(&tag) {
            existing.push(tag);
        }
    }
}
