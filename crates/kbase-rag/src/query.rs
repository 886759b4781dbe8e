/// Lowercase, turn punctuation into spaces and collapse whitespace.
pub fn normalize_query(query: &str) -> String {
    let cleaned: String = query
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c.is_whitespace() { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `chat:<corpus hash>:<normalized query>`; `default` stands in for a missing hash.
pub fn cache_key(query: &str, source_hash: Option<&str>) -> String {
    format!("chat:{}:{}", source_hash.unwrap_or("default"), normalize_query(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_punctuation_and_spacing() {
        assert_eq!(normalize_query("  What frameworks does Drata support? "), "what frameworks does drata support");
        assert_eq!(normalize_query("SOC-2 / ISO_27001!!"), "soc 2 iso_27001");
        assert_eq!(normalize_query("?!"), "");
    }

    #[test]
    fn cache_key_shape() {
        assert_eq!(cache_key("Is there a startup plan?", None), "chat:default:is there a startup plan");
        assert_eq!(cache_key("Pricing", Some("00ff")), "chat:00ff:pricing");
    }
}
