use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a whole single- or double-quoted string literal. Intentionally
/// does not treat `\` as an escape character: Kavun strings may contain raw
/// backslashes up to the closing quote, matching the reference lexer.
static STRING_LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#""[^"]*"|'[^']*'"#).unwrap());

/// An expression with its string literals pulled out into a placeholder
/// table, so later textual passes (postfix relational translation) never
/// mistake string content for Turkish keywords.
pub struct Shielded {
    pub text: String,
    pub placeholders: Vec<String>,
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"__KAVUN_STR_(\d+)__").unwrap());

/// Inverse of [`shield_strings`]: substitutes placeholder tokens in `text`
/// back with their original (re-quoted) string literal. Used when an
/// argument list has to be split on shielded text and then independently
/// re-compiled, since each recursive `compile_expression` call starts
/// shielding from scratch.
///
/// The re-wrap picks whichever quote character (`"` or `'`) doesn't appear
/// in the literal's own content, so a single-quoted literal containing an
/// embedded `"` (e.g. `'he said "hi"'`) doesn't get rewrapped as `"he said
/// "hi""`, which would re-shield as only `"he said "` and truncate the rest.
/// Falls back to `"` if the content contains both quote characters; nothing
/// in this grammar escapes a quote mid-literal, so that case was already
/// unrepresentable before re-shielding entered the picture.
pub fn restore(text: &str, placeholders: &[String]) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures| {
            let index: usize = caps[1].parse().unwrap_or(0);
            match placeholders.get(index) {
                Some(literal) => {
                    let quote = if !literal.contains('"') {
                        '"'
                    } else if !literal.contains('\'') {
                        '\''
                    } else {
                        '"'
                    };
                    format!("{quote}{literal}{quote}")
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

pub fn shield_strings(expr: &str) -> Shielded {
    let mut placeholders = Vec::new();
    let text = STRING_LITERAL
        .replace_all(expr, |caps: &regex::Captures| {
            let literal = &caps[0];
            placeholders.push(literal[1..literal.len() - 1].to_string());
            format!("__KAVUN_STR_{}__", placeholders.len() - 1)
        })
        .into_owned();
    Shielded { text, placeholders }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shields_double_and_single_quoted_strings() {
        let shielded = shield_strings(r#""Merhaba" + ' Dünya'"#);
        assert_eq!(shielded.text, "__KAVUN_STR_0__ + __KAVUN_STR_1__");
        assert_eq!(shielded.placeholders, vec!["Merhaba", " Dünya"]);
    }

    #[test]
    fn leaves_non_string_text_untouched() {
        let shielded = shield_strings("a + b");
        assert_eq!(shielded.text, "a + b");
        assert!(shielded.placeholders.is_empty());
    }

    #[test]
    fn restores_single_quoted_literal_with_embedded_double_quote() {
        let placeholders = vec![r#"he said "hi""#.to_string()];
        let restored = restore("__KAVUN_STR_0__", &placeholders);
        assert_eq!(restored, r#"'he said "hi"'"#);
        // The result must re-shield as one literal, not truncate at the
        // first embedded double quote.
        let reshielded = shield_strings(&restored);
        assert_eq!(reshielded.placeholders, placeholders);
    }

    #[test]
    fn restores_plain_literal_with_double_quotes_by_default() {
        let placeholders = vec!["Merhaba".to_string()];
        assert_eq!(restore("__KAVUN_STR_0__", &placeholders), "\"Merhaba\"");
    }
}
