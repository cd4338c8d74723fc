//! Delimiter scanning for inline math.
//!
//! A math expression opens at an unescaped `$` and closes at the nearest
//! following unescaped `$`. Anything that fails to form an expression
//! (lone `$`, empty body, rejected currency amount) stays literal text,
//! so the scanner never fails and its output always partitions the input.

use super::types::{DELIMITER, Token};

const ESCAPE: u8 = b'\\';
const DOLLAR: u8 = DELIMITER as u8;

/// Operators whose presence marks a body as math even when it reads like
/// an amount of money.
const MATH_OPERATORS: &[char] = &['=', '+', '-', '^', '_', '{', '}', '\\'];

/// Tokenizer switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// Recognize `$$…$$` as a single display expression.
    pub display_math: bool,
    /// Treat bodies like `120 pesos` as text instead of math.
    pub currency_heuristic: bool,
}

/// Scan `source` into an ordered list of text and math tokens.
pub fn tokenize(source: &str, options: &TokenizerOptions) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            ESCAPE => i = skip_escape(source, i),
            DOLLAR => {
                if let Some((end, display)) = scan_expression(source, i, options) {
                    if i > text_start {
                        tokens.push(Token::text(&source[text_start..i], text_start));
                    }
                    tokens.push(Token::math(&source[i..end], i, display));
                    i = end;
                    text_start = end;
                } else {
                    i += 1;
                }
            }
            // Continuation bytes of multi-byte chars never equal `$` or `\`.
            _ => i += 1,
        }
    }

    if text_start < bytes.len() {
        tokens.push(Token::text(&source[text_start..], text_start));
    }
    tokens
}

/// Returns true if `source` contains at least one math expression.
pub fn has_math(source: &str, options: &TokenizerOptions) -> bool {
    tokenize(source, options).iter().any(Token::is_math)
}

/// Offset just past an escape sequence starting at `at`.
fn skip_escape(source: &str, at: usize) -> usize {
    let next = at + 1;
    let escaped_len = source[next..].chars().next().map_or(0, char::len_utf8);
    next + escaped_len
}

/// Try to form an expression whose opening `$` sits at `open`.
///
/// Returns the exclusive end offset and whether it is display math.
fn scan_expression(source: &str, open: usize, options: &TokenizerOptions) -> Option<(usize, bool)> {
    let bytes = source.as_bytes();
    if options.display_math && bytes.get(open + 1) == Some(&DOLLAR) {
        if let Some(close) = find_closing(source, open + 2, 2)
            && close > open + 2
        {
            return Some((close + 2, true));
        }
    }

    let close = find_closing(source, open + 1, 1)?;
    if close == open + 1 {
        return None;
    }
    if options.currency_heuristic && looks_like_currency(&source[open + 1..close]) {
        return None;
    }
    Some((close + 1, false))
}

/// Offset of the next unescaped run of `width` delimiters at or after `from`.
fn find_closing(source: &str, from: usize, width: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            ESCAPE => j = skip_escape(source, j),
            DOLLAR => {
                if width == 1 || bytes.get(j + 1) == Some(&DOLLAR) {
                    return Some(j);
                }
                j += 1;
            }
            _ => j += 1,
        }
    }
    None
}

/// `120 pesos` reads as money: leading digits, a word, and no operators.
fn looks_like_currency(body: &str) -> bool {
    let body = body.trim();
    let begins_with_number = body.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !begins_with_number || body.contains(MATH_OPERATORS) {
        return false;
    }
    let mut run = 0;
    for ch in body.chars() {
        if is_word_letter(ch) {
            run += 1;
            if run >= 2 {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Latin letters, Spanish accents included. Greek letters are math.
const fn is_word_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
        || matches!(
            ch,
            'á' | 'é' | 'í' | 'ó' | 'ú' | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú' | 'ñ' | 'Ñ'
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TokenKind;

    fn plain(source: &str) -> Vec<Token> {
        tokenize(source, &TokenizerOptions::default())
    }

    #[test]
    fn test_no_delimiter_yields_single_text_token() {
        let tokens = plain("just some words");
        assert_eq!(tokens, vec![Token::text("just some words", 0)]);
    }

    #[test]
    fn test_empty_source_yields_no_tokens() {
        assert!(plain("").is_empty());
    }

    #[test]
    fn test_text_math_text() {
        let tokens = plain("a$b$c");
        assert_eq!(
            tokens,
            vec![
                Token::text("a", 0),
                Token::math("$b$", 1, false),
                Token::text("c", 4),
            ]
        );
    }

    #[test]
    fn test_multiple_expressions_on_one_line() {
        let tokens = plain("Calcula $x^2$ y $y^2$");
        let math: Vec<_> = tokens.iter().filter(|t| t.is_math()).collect();
        assert_eq!(math.len(), 2);
        assert_eq!(math[0].range(), 8..13);
        assert_eq!(math[1].range(), 16..21);
        assert_eq!(math[1].body(), "y^2");
    }

    #[test]
    fn test_unterminated_delimiter_is_text() {
        let tokens = plain("cuesta $5 nada");
        assert_eq!(tokens, vec![Token::text("cuesta $5 nada", 0)]);
    }

    #[test]
    fn test_trailing_lone_delimiter_after_expression() {
        let tokens = plain("$a$ b $");
        assert_eq!(
            tokens,
            vec![Token::math("$a$", 0, false), Token::text(" b $", 3)]
        );
    }

    #[test]
    fn test_empty_body_is_not_math() {
        let tokens = plain("$$x$");
        assert_eq!(
            tokens,
            vec![Token::text("$", 0), Token::math("$x$", 1, false)]
        );
    }

    #[test]
    fn test_match_is_non_greedy() {
        let tokens = plain("$a$$b$");
        assert_eq!(
            tokens,
            vec![Token::math("$a$", 0, false), Token::math("$b$", 3, false)]
        );
    }

    #[test]
    fn test_escaped_delimiter_never_opens() {
        let tokens = plain(r"precio \$5 y \$6");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind(), TokenKind::Text);
    }

    #[test]
    fn test_escaped_delimiter_inside_body_does_not_close() {
        let tokens = plain(r"$a\$b$ c");
        assert_eq!(tokens[0].raw(), r"$a\$b$");
        assert_eq!(tokens[1].raw(), " c");
    }

    #[test]
    fn test_escape_before_multibyte_char_keeps_boundaries() {
        let tokens = plain("\\é $x$");
        assert_eq!(tokens[0].raw(), "\\é ");
        assert_eq!(tokens[1].raw(), "$x$");
    }

    #[test]
    fn test_multibyte_text_offsets_are_bytes() {
        let tokens = plain("ñ $x$");
        assert_eq!(tokens[1].start(), "ñ ".len());
    }

    #[test]
    fn test_display_math_when_enabled() {
        let options = TokenizerOptions {
            display_math: true,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize("a $$\\sum x$$ b", &options);
        assert_eq!(tokens[1].raw(), "$$\\sum x$$");
        assert!(tokens[1].is_display());
        assert_eq!(tokens[1].body(), "\\sum x");
    }

    #[test]
    fn test_display_math_disabled_by_default() {
        let tokens = plain("$$x$$");
        assert!(tokens.iter().all(|t| !t.is_display()));
        assert_eq!(tokens[1].raw(), "$x$");
    }

    #[test]
    fn test_currency_heuristic_rejects_amounts() {
        let options = TokenizerOptions {
            currency_heuristic: true,
            ..TokenizerOptions::default()
        };
        let tokens = tokenize("Cuesta $120 pesos y $x+1$", &options);
        let math: Vec<_> = tokens.iter().filter(|t| t.is_math()).collect();
        assert_eq!(math.len(), 1);
        assert_eq!(math[0].raw(), "$x+1$");
    }

    #[test]
    fn test_currency_heuristic_keeps_operators() {
        assert!(!looks_like_currency("2x = 4 cm"));
        assert!(looks_like_currency("120 pesos"));
        assert!(!looks_like_currency("x^2"));
    }

    #[test]
    fn test_currency_heuristic_keeps_greek_formulas() {
        let options = TokenizerOptions {
            currency_heuristic: true,
            ..TokenizerOptions::default()
        };
        for source in ["Perímetro $2πr$", "Área $4 αβ$"] {
            let math = tokenize(source, &options).iter().filter(|t| t.is_math()).count();
            assert_eq!(math, 1, "{source}");
        }
        assert!(looks_like_currency("3 años"));
    }

    #[test]
    fn test_has_math() {
        let options = TokenizerOptions::default();
        assert!(has_math("a $x$", &options));
        assert!(!has_math("a $ x", &options));
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tokens_partition_source(source in "[a-z$\\\\ \n•ñ1.*-]{0,64}") {
                for options in [
                    TokenizerOptions::default(),
                    TokenizerOptions { display_math: true, currency_heuristic: true },
                ] {
                    let tokens = tokenize(&source, &options);
                    let joined: String = tokens.iter().map(Token::raw).collect();
                    prop_assert_eq!(&joined, &source);

                    let mut expected_start = 0;
                    for token in &tokens {
                        prop_assert_eq!(token.start(), expected_start);
                        prop_assert_eq!(&source[token.range()], token.raw());
                        expected_start = token.end();
                    }
                }
            }

            #[test]
            fn source_without_delimiter_is_one_text_token(source in "[^$]{1,64}") {
                let tokens = tokenize(&source, &TokenizerOptions::default());
                prop_assert_eq!(tokens, vec![Token::text(&source, 0)]);
            }

            #[test]
            fn math_bodies_are_never_empty(source in "[ab$\\\\]{0,32}") {
                for token in tokenize(&source, &TokenizerOptions::default()) {
                    if token.is_math() {
                        prop_assert!(!token.body().is_empty());
                    }
                }
            }
        }
    }
}
