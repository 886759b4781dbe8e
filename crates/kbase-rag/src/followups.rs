//! Suggested next questions, chosen from fixed tables by document category.
use kbase_core::Category;

pub const MAX_FOLLOW_UPS: usize = 4;

const GENERIC: [&str; 5] = [
    "How does Drata compare to other compliance tools?",
    "What integrations does Drata support?",
    "How long does it take to get SOC 2 certified with Drata?",
    "What frameworks does Drata support?",
    "Is there a free trial available?",
];

pub fn category_questions(category: Category) -> [&'static str; 3] {
    match category {
        Category::Pricing => [
            "What's included in the startup plan?",
            "Are there any setup fees?",
            "How does pricing scale with company size?",
        ],
        Category::Product => [
            "How does automated evidence collection work?",
            "What kind of reporting does Drata provide?",
            "Can Drata help with multiple frameworks simultaneously?",
        ],
        Category::Security => [
            "How does Drata ensure data security?",
            "What access controls does Drata have?",
            "How does Drata handle sensitive compliance data?",
        ],
        Category::Integrations => [
            "Which cloud providers does Drata integrate with?",
            "How do integrations collect evidence automatically?",
            "Can Drata integrate with custom tools?",
        ],
        Category::Compliance => [
            "What's the difference between SOC 2 Type I and Type II?",
            "How does Drata help with ISO 27001?",
            "What evidence is needed for HIPAA compliance?",
        ],
    }
}

/// Category questions first, then the generic ones. Candidates containing the
/// first word of `original_query` (case-insensitive) are dropped; this is a
/// coarse single-word test and may remove unrelated questions sharing that word.
pub fn select_follow_ups(original_query: &str, category: Option<Category>) -> Vec<String> {
    let first_word = original_query.split_whitespace().next().map(str::to_lowercase);
    let candidates = category.map(category_questions).into_iter().flatten().chain(GENERIC);

    let mut selected: Vec<String> = Vec::with_capacity(MAX_FOLLOW_UPS);
    for candidate in candidates {
        if let Some(word) = &first_word {
            if candidate.to_lowercase().contains(word.as_str()) {
                continue;
            }
        }
        if selected.iter().any(|s| s == candidate) {
            continue;
        }
        selected.push(candidate.to_string());
        if selected.len() == MAX_FOLLOW_UPS {
            break;
        }
    }
    selected
}
