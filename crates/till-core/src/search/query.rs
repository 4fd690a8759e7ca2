//! Query parsing: quoted phrases plus whitespace-separated words.

/// Splits a raw query into case-folded search terms.
///
/// Every complete double-quoted, non-empty substring becomes one literal
/// term (quotes stripped). The quoted parts are removed from the query and
/// the remainder is split on whitespace into further terms. A blank query
/// yields no terms.
///
/// ## Example
/// ```rust
/// use till_core::parse_query;
///
/// assert_eq!(parse_query(r#"cola "fresh water" 2.5"#),
///            vec!["fresh water", "cola", "2.5"]);
/// assert!(parse_query("   ").is_empty());
/// ```
pub fn parse_query(query: &str) -> Vec<String> {
    let chars: Vec<char> = query.chars().collect();
    let mut terms = Vec::new();
    let mut remainder = String::with_capacity(query.len());

    // Lift out complete "..." pairs left to right; an unpaired or empty
    // quote stays in the remainder and is treated as an ordinary character.
    let mut consumed = 0;
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '"' {
            if let Some(close) = (i + 1..chars.len()).find(|&k| chars[k] == '"') {
                if close > i + 1 {
                    terms.push(chars[i + 1..close].iter().collect::<String>().to_lowercase());
                    remainder.extend(&chars[consumed..i]);
                    consumed = close + 1;
                    i = close + 1;
                    continue;
                }
            }
        }
        i += 1;
    }
    remainder.extend(&chars[consumed..]);

    terms.extend(remainder.split_whitespace().map(|word| word.to_lowercase()));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(parse_query("cola water"), vec!["cola", "water"]);
        assert_eq!(parse_query("  Cola   WATER "), vec!["cola", "water"]);
    }

    #[test]
    fn test_blank_query_yields_no_terms() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("   \t ").is_empty());
    }

    #[test]
    fn test_quoted_phrase_is_one_term() {
        assert_eq!(parse_query(r#""fresh water""#), vec!["fresh water"]);
        assert_eq!(
            parse_query(r#"cola "Fresh Water" 2.5"#),
            vec!["fresh water", "cola", "2.5"]
        );
    }

    #[test]
    fn test_unpaired_quote_stays_literal() {
        // no closing quote: the quote character survives into the word term
        assert_eq!(parse_query(r#""co"#), vec![r#""co"#]);
    }

    #[test]
    fn test_empty_quotes_are_not_a_phrase() {
        assert_eq!(parse_query(r#""" cola"#), vec![r#""""#, "cola"]);
    }

    #[test]
    fn test_adjacent_phrases() {
        assert_eq!(
            parse_query(r#""a b""c d""#),
            vec!["a b", "c d"]
        );
    }
}
