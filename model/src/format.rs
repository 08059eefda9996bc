//! Quoting, escaping and identifier rules for AL source text.

/// Longest object name the AL compiler accepts.
pub const MAX_OBJECT_NAME_LENGTH: usize = 30;

/// Surround `text` with `delimiter` on whichever side lacks it.
pub fn wrap(text: &str, delimiter: char) -> String {
    let mut result = String::with_capacity(text.len() + 2);
    if !text.starts_with(delimiter) {
        result.push(delimiter);
    }
    result.push_str(text);
    if !text.ends_with(delimiter) {
        result.push(delimiter);
    }
    result
}

pub fn single_quote(text: &str) -> String {
    wrap(text, '\'')
}

pub fn double_quote(text: &str) -> String {
    wrap(text, '"')
}

/// Remove every character outside `[0-9a-zA-Z]`.
pub fn sanitize_identifier(text: &str) -> String {
    text.chars().filter(char::is_ascii_alphanumeric).collect()
}

pub fn has_special_chars(text: &str) -> bool {
    text.chars().any(|c| !c.is_ascii_alphanumeric())
}

pub fn quote_if_special(text: &str) -> String {
    if has_special_chars(text) {
        double_quote(text)
    } else {
        text.to_string()
    }
}

pub fn trim_double_quotes(text: &str) -> String {
    text.chars().filter(|&c| c != '"').collect()
}

/// Keep at most `max_len` characters.
pub fn truncate(text: &str, max_len: usize) -> String {
    text.chars().take(max_len).collect()
}

/// Turn any name into one an object declaration accepts.
pub fn truncate_object_name(name: &str) -> String {
    let bare = trim_double_quotes(name);
    quote_if_special(&truncate(&bare, MAX_OBJECT_NAME_LENGTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_is_idempotent() {
        assert_eq!(wrap("'abc", '\''), "'abc'");
        assert_eq!(wrap("abc", '\''), "'abc'");
        assert_eq!(wrap("'abc'", '\''), "'abc'");
        assert_eq!(wrap("abc'", '\''), "'abc'");
    }

    #[test]
    fn test_wrap_edge_cases() {
        assert_eq!(wrap("", '\''), "''");
        assert_eq!(wrap("'", '\''), "'");
    }

    #[test]
    fn test_special_chars() {
        assert!(!has_special_chars("Customer"));
        assert!(has_special_chars("Sales Header"));
        assert!(has_special_chars("No."));
        assert!(has_special_chars("Name/Value Buffer"));
        assert!(has_special_chars("Straße"));
    }

    #[test]
    fn test_quote_if_special() {
        assert_eq!(quote_if_special("Customer"), "Customer");
        assert_eq!(quote_if_special("CDS Worker"), "\"CDS Worker\"");
        assert_eq!(quote_if_special("\"CDS Worker\""), "\"CDS Worker\"");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("CRM Integration Management"), "CRMIntegrationManagement");
        assert_eq!(sanitize_identifier("\"No.\""), "No");
        assert_eq!(sanitize_identifier("Job Queue - Enqueue"), "JobQueueEnqueue");
    }

    #[test]
    fn test_truncate_is_a_hard_cut() {
        assert_eq!(truncate("abcdef", 3), "abc");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_truncate_object_name() {
        assert_eq!(
            truncate_object_name("CDS Worker-Employee Map With Extras"),
            "\"CDS Worker-Employee Map With E\""
        );
        assert_eq!(truncate_object_name("\"Short Name\""), "\"Short Name\"");
        assert_eq!(truncate_object_name("Plain"), "Plain");
    }
}
