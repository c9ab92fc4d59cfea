use super::types::SERVICE_TAXONOMY;

/// Return the first taxonomy label, in taxonomy order, that occurs anywhere in
/// the lowercase page text.
pub fn classify_service_type(text: &str) -> Option<&'static str> {
    SERVICE_TAXONOMY
        .iter()
        .find(|label| text.contains(label.to_lowercase().as_str()))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_order_beats_text_order() {
        assert_eq!(
            classify_service_type("this is a cloud migration project"),
            Some("cloud")
        );
        assert_eq!(
            classify_service_type("a migration to the cloud"),
            Some("cloud")
        );
    }

    #[test]
    fn test_labels_keep_declared_spelling() {
        assert_eq!(classify_service_type("new ai platform"), Some("AI"));
        assert_eq!(classify_service_type("a bpo deal"), Some("BPO"));
    }

    #[test]
    fn test_multi_word_labels_are_exact_substrings() {
        assert_eq!(
            classify_service_type("application development work"),
            Some("application development")
        );
        // Both words present, but not adjacent
        assert_eq!(classify_service_type("development of an application"), None);
    }

    #[test]
    fn test_substring_matching() {
        // "ai" is found inside other words, just as any substring would be
        assert_eq!(classify_service_type("a maintenance deal"), Some("AI"));
    }

    #[test]
    fn test_idempotent() {
        let text = "managed services for a data platform";
        assert_eq!(classify_service_type(text), classify_service_type(text));
        assert_eq!(classify_service_type(text), Some("data"));
    }

    #[test]
    fn test_absent() {
        assert_eq!(classify_service_type("office furniture supply"), None);
        assert_eq!(classify_service_type(""), None);
    }
}
