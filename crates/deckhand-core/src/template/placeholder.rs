//! `${id}` placeholder substitution
//!
//! Single pass: substituted values are never scanned again, and tokens the
//! resolver does not know are copied verbatim.

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Replace every `${id}` in `text` for which `resolve` returns a value.
///
/// # Example
/// ```
/// use deckhand_core::template::placeholder::substitute;
///
/// let out = substitute("http://${host}:${port}", |id| match id {
///     "host" => Some("localhost".to_string()),
///     _ => None,
/// });
/// assert_eq!(out, "http://localhost:${port}");
/// ```
pub fn substitute<F>(text: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        match token_at(candidate) {
            Some((id, len)) => {
                match resolve(id) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&candidate[..len]),
                }
                rest = &candidate[len..];
            }
            None => {
                out.push_str(OPEN);
                rest = &candidate[OPEN.len()..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Parse a token at the start of `s` (which starts with `${`).
///
/// Returns the ID and the byte length of the whole token. IDs are non-empty
/// and contain no whitespace, `$`, `{` or `}`.
fn token_at(s: &str) -> Option<(&str, usize)> {
    let body = &s[OPEN.len()..];
    let end = body.find(|c: char| c == CLOSE || c == '$' || c == '{' || c.is_whitespace())?;
    if end == 0 || !body[end..].starts_with(CLOSE) {
        return None;
    }
    Some((&body[..end], OPEN.len() + end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(id: &str) -> Option<String> {
        match id {
            "a" => Some("1".to_string()),
            "b" => Some("${a}".to_string()),
            _ => None,
        }
    }

    #[test]
    fn test_replaces_known_tokens() {
        assert_eq!(substitute("x=${a}, y=${a}", lookup), "x=1, y=1");
    }

    #[test]
    fn test_unknown_tokens_are_left_alone() {
        assert_eq!(substitute("${a}-${zzz}", lookup), "1-${zzz}");
    }

    #[test]
    fn test_no_recursive_expansion() {
        assert_eq!(substitute("${b}", lookup), "${a}");
    }

    #[test]
    fn test_literal_dollars_and_unterminated() {
        assert_eq!(substitute("$a $ {a} ${a", lookup), "$a $ {a} ${a");
        assert_eq!(substitute("${}", lookup), "${}");
        assert_eq!(substitute("${${a}}", lookup), "${1}");
        assert_eq!(substitute("", lookup), "");
    }

    #[test]
    fn test_adjacent_and_multibyte() {
        assert_eq!(substitute("ä${a}${a}ö", lookup), "ä11ö");
    }
}
