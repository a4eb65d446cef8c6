use crate::error::{Error, Result};
use crate::sql::{keyword::Keyword, token::Token, token_kind::TokenKind};

/// Total-coverage SQL tokenizer producing a flat stream of `Token`s.
///
/// Scope / Intent:
/// - Designed for safety analysis of untrusted SQL text: every later stage
///   reasons about keywords and relation names purely through token kinds.
/// - Whitespace and comments are emitted as tokens, not skipped, so the
///   concatenation of all token spans reconstructs the input exactly. That
///   property is what makes "this word sits inside a string literal" a fact
///   instead of a guess.
///
/// Behavior:
/// - `'...'` is one `StringLiteral`; an embedded `''` continues the literal.
/// - `"..."` is one `QuotedIdent` with the same doubling rule; the payload is
///   the decoded name.
/// - `--` to end of line and non-nesting `/* ... */` are `Comment`s.
/// - Word runs are classified against the fixed keyword vocabulary
///   case-insensitively; anything else keeps its original case as `Ident`.
/// - Digit-led runs become `Number` (integer, optional fraction/exponent).
///
/// Errors:
/// - `MalformedInput` when a string literal, quoted identifier, or block
///   comment is still open at end of input.
///
/// Complexity:
/// - O(n) time, O(t) space where `t` is number of tokens.
pub fn tokenize(sql: &str) -> Result<Vec<Token>> {
    let mut out = Vec::new();
    let bytes = sql.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let c = bytes[i];

        // Whitespace run
        if c.is_ascii_whitespace() {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            out.push(Token::new(TokenKind::Whitespace, start, i));
            continue;
        }

        // Line comment: `--` up to (not including) the newline
        if c == b'-' && bytes.get(i + 1) == Some(&b'-') {
            i += 2;
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            out.push(Token::new(TokenKind::Comment, start, i));
            continue;
        }

        // Block comment, non-nesting
        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            i += 2;
            let mut closed = false;
            while i + 1 < bytes.len() {
                if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    i += 2;
                    closed = true;
                    break;
                }
                i += 1;
            }
            if !closed {
                return Err(Error::MalformedInput {
                    construct: "block comment",
                    offset: start,
                });
            }
            out.push(Token::new(TokenKind::Comment, start, i));
            continue;
        }

        // String literal
        if c == b'\'' {
            i = scan_quoted(bytes, i, b'\'').ok_or(Error::MalformedInput {
                construct: "string literal",
                offset: start,
            })?;
            out.push(Token::new(TokenKind::StringLiteral, start, i));
            continue;
        }

        // Quoted identifier; payload is the decoded name
        if c == b'"' {
            i = scan_quoted(bytes, i, b'"').ok_or(Error::MalformedInput {
                construct: "quoted identifier",
                offset: start,
            })?;
            let decoded = sql[start + 1..i - 1].replace("\"\"", "\"");
            out.push(Token::new(TokenKind::QuotedIdent(decoded), start, i));
            continue;
        }

        // Word: keyword or identifier
        if c.is_ascii_alphabetic() || c == b'_' {
            i += 1;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let text = &sql[start..i];
            let lower = text.to_ascii_lowercase();
            let kind = Keyword::from_lower(&lower)
                .map(TokenKind::Keyword)
                .unwrap_or_else(|| TokenKind::Ident(text.to_string()));
            out.push(Token::new(kind, start, i));
            continue;
        }

        // Number: digits, optional fraction, optional exponent
        if c.is_ascii_digit() {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit()) {
                i += 2;
                while i < bytes.len() && bytes[i].is_ascii_digit() {
                    i += 1;
                }
            }
            if matches!(bytes.get(i).copied(), Some(b'e' | b'E')) {
                let consume = match bytes.get(i + 1).copied() {
                    Some(b'+' | b'-') => bytes
                        .get(i + 2)
                        .is_some_and(|b| b.is_ascii_digit())
                        .then_some(2),
                    Some(d) if d.is_ascii_digit() => Some(1),
                    _ => None,
                };
                if let Some(consume) = consume {
                    i += consume;
                    while i < bytes.len() && bytes[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            out.push(Token::new(
                TokenKind::Number(sql[start..i].to_string()),
                start,
                i,
            ));
            continue;
        }

        // Structural punctuation and remaining single ASCII characters
        if c.is_ascii() {
            i += 1;
            let kind = match c {
                b',' => TokenKind::Comma,
                b'.' => TokenKind::Dot,
                b';' => TokenKind::Semicolon,
                b'(' => TokenKind::ParenOpen,
                b')' => TokenKind::ParenClose,
                other => TokenKind::Other(other as char),
            };
            out.push(Token::new(kind, start, i));
            continue;
        }

        // Non-ASCII: consume one full character so spans stay on char
        // boundaries
        let Some(ch) = sql[i..].chars().next() else {
            break;
        };
        i += ch.len_utf8();
        out.push(Token::new(TokenKind::Other(ch), start, i));
    }

    Ok(out)
}

/// Scan a quoted run starting at `open`; returns the index just past the
/// closing quote. A doubled quote character continues the run.
fn scan_quoted(bytes: &[u8], open: usize, quote: u8) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return Some(i + 1);
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::keyword::Keyword;
    use crate::sql::token_kind::TokenKind;
    use rstest::rstest;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        tokenize(sql)
            .expect("tokenize should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn basic_select_sequence() {
        let toks = tokenize("SELECT a, b FROM t").expect("valid input");
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::Select)));
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(toks.iter().any(|t| t.ident() == Some("a")));
        assert!(toks.iter().any(|t| t.ident() == Some("b")));
        assert!(toks.iter().any(|t| t.ident() == Some("t")));
    }

    #[test]
    fn preserves_case_for_identifiers() {
        let toks = tokenize("From MyTable").expect("valid input");
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(toks.iter().any(|t| t.ident() == Some("MyTable")));
    }

    #[rstest]
    #[case("SELECT id, title FROM pull_request ORDER BY createdon DESC")]
    #[case("select 'it''s' as note -- trailing\nfrom t")]
    #[case("/* lead */ SELECT \"Mixed\".\"Case\" FROM \"Pull_Request\";")]
    #[case("  \t\n ")]
    #[case("")]
    fn spans_cover_every_byte(#[case] sql: &str) {
        let toks = tokenize(sql).expect("valid input");
        let mut cursor = 0;
        for t in &toks {
            assert_eq!(t.start, cursor, "gap before token {t:?}");
            cursor = t.end;
        }
        assert_eq!(cursor, sql.len());
        let rebuilt: String = toks.iter().map(|t| t.text(sql)).collect();
        assert_eq!(rebuilt, sql);
    }

    #[test]
    fn doubled_quote_stays_inside_string_literal() {
        let toks = tokenize("SELECT 'don''t delete'").expect("valid input");
        let literals: Vec<_> = toks
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::StringLiteral))
            .collect();
        assert_eq!(literals.len(), 1);
        assert_eq!(literals[0].text("SELECT 'don''t delete'"), "'don''t delete'");
        // The word delete sits inside the literal, so no keyword token exists.
        assert!(!toks.iter().any(|t| t.is_keyword(Keyword::Delete)));
    }

    #[test]
    fn quoted_identifier_is_decoded() {
        let toks = tokenize("SELECT * FROM \"odd\"\"name\"").expect("valid input");
        assert!(
            toks.iter()
                .any(|t| t.name_part() == Some(("odd\"name", true)))
        );
    }

    #[test]
    fn comments_hide_their_content() {
        let toks = tokenize("SELECT 1 -- drop table x\n/* delete everything */").expect("valid");
        assert_eq!(
            toks.iter().filter(|t| t.kind == TokenKind::Comment).count(),
            2
        );
        assert!(!toks.iter().any(|t| t.is_keyword(Keyword::Drop)));
        assert!(!toks.iter().any(|t| t.is_keyword(Keyword::Delete)));
    }

    #[rstest]
    #[case("SELECT 'open", "string literal")]
    #[case("SELECT \"open", "quoted identifier")]
    #[case("SELECT 1 /* open", "block comment")]
    fn unterminated_constructs_fail(#[case] sql: &str, #[case] expected: &str) {
        match tokenize(sql) {
            Err(Error::MalformedInput { construct, .. }) => assert_eq!(construct, expected),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[rstest]
    #[case("42", "42")]
    #[case("1.5", "1.5")]
    #[case("2e10", "2e10")]
    #[case("3.14e-2", "3.14e-2")]
    fn numbers_lex_as_one_token(#[case] sql: &str, #[case] expected: &str) {
        let k = kinds(sql);
        assert_eq!(k, vec![TokenKind::Number(expected.to_string())]);
    }

    #[test]
    fn qualified_name_produces_dot_token() {
        let k = kinds("insightly.pull_request");
        assert_eq!(
            k,
            vec![
                TokenKind::Ident("insightly".into()),
                TokenKind::Dot,
                TokenKind::Ident("pull_request".into()),
            ]
        );
    }

    #[test]
    fn punctuation_and_other_tokens() {
        let toks = tokenize("SELECT * FROM t;").expect("valid input");
        assert!(toks.iter().any(|t| matches!(t.kind, TokenKind::Other('*'))));
        assert!(toks.iter().any(|t| t.kind == TokenKind::Semicolon));
    }

    #[test]
    fn semicolon_inside_literal_is_not_a_separator() {
        let toks = tokenize("SELECT 'a; b'").expect("valid input");
        assert!(!toks.iter().any(|t| t.kind == TokenKind::Semicolon));
    }
}
