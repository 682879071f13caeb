//! Identifier derivation for generated entities and properties.

/// Class name used when a table name has no alphanumeric content.
pub const FALLBACK_NAME: &str = "TableRecord";

/// Derive a PascalCase identifier from a table or column name.
///
/// Every run of non-alphanumeric characters is a word boundary; each word
/// keeps its casing except for an upper-cased first letter. The result is
/// never empty and never starts with a digit, and deriving a name from an
/// already derived name returns it unchanged.
#[must_use]
pub fn pascal_case(name: &str) -> String {
    let mut candidate: String = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect();

    if candidate.is_empty() {
        return FALLBACK_NAME.to_string();
    }
    if candidate.starts_with(|c: char| c.is_ascii_digit()) {
        candidate.insert(0, '_');
    }
    candidate
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("users", "Users")]
    #[case("work_order_parts", "WorkOrderParts")]
    #[case("capa-status history", "CapaStatusHistory")]
    #[case("userID", "UserID")]
    #[case("2fa_tokens", "_2faTokens")]
    #[case("", FALLBACK_NAME)]
    #[case("__--  ", FALLBACK_NAME)]
    #[case("_private", "Private")]
    #[case("mañana", "MaAna")]
    fn derives_identifiers(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pascal_case(input), expected);
    }

    #[rstest]
    #[case("work_order_parts")]
    #[case("2fa_tokens")]
    #[case("")]
    #[case("___")]
    #[case("x")]
    #[case("9")]
    fn derivation_is_idempotent(#[case] input: &str) {
        let once = pascal_case(input);
        assert_eq!(pascal_case(&once), once);
    }

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("--")]
    #[case("a b c")]
    fn derivation_yields_valid_identifier(#[case] input: &str) {
        let name = pascal_case(input);
        let first = name.chars().next().expect("name is never empty");
        assert!(first == '_' || first.is_ascii_alphabetic());
        assert!(name.chars().all(|c| c == '_' || c.is_ascii_alphanumeric()));
    }
}
