//! Token kind definitions for the SQL tokenizer.
//!
//! Each `TokenKind` variant represents a syntactic atom discovered during the
//! scanning phase. Unlike a lenient autocomplete scanner, the classification
//! here is load-bearing for safety: later stages decide "is this byte inside
//! a string literal" purely from these kinds, so literals, quoted
//! identifiers, comments, and whitespace are all first-class tokens rather
//! than skipped input.
//!
//! Design goals:
//! - Preserve original identifier casing via `Ident(String)` and the decoded
//!   (escape-resolved) name via `QuotedIdent(String)` for allow-list
//!   matching.
//! - Keep the set of structural punctuation minimal (comma, dot, semicolon,
//!   parens); everything else is `Other(char)`.
//! - Provide ergonomic helpers (`is_keyword`, `ident`, `name_part`) to avoid
//!   verbose pattern matches at call sites.
//!
//! See `keyword.rs` for the `Keyword` enum and `tokenizer.rs` for tokenization.

use crate::sql::keyword::Keyword;

/// Classification for a token produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Table / alias / column / generic identifier, original case preserved.
    Ident(String),
    /// Double-quoted identifier; payload is the decoded name (`""` → `"`).
    QuotedIdent(String),
    /// Recognized SQL keyword.
    Keyword(Keyword),
    /// Single-quoted literal (content is never inspected downstream).
    StringLiteral,
    /// `-- ...` or `/* ... */`.
    Comment,
    /// Numeric literal, raw text preserved.
    Number(String),
    /// A run of ASCII whitespace.
    Whitespace,
    /// Comma `,` (separates FROM list items, select items, etc.).
    Comma,
    /// Dot `.` (qualified names like `schema.table`).
    Dot,
    /// Semicolon `;` (statement separator).
    Semicolon,
    /// Opening parenthesis `(`.
    ParenOpen,
    /// Closing parenthesis `)`.
    ParenClose,
    /// Any other single character we do not specially classify.
    Other(char),
}

impl TokenKind {
    /// True if this token is the given keyword.
    pub fn is_keyword(&self, kw: Keyword) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == kw)
    }

    /// Returns the identifier text if this token is a bare `Ident`.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns `(name, quoted)` for tokens usable as a relation name part.
    pub fn name_part(&self) -> Option<(&str, bool)> {
        match self {
            TokenKind::Ident(s) => Some((s.as_str(), false)),
            TokenKind::QuotedIdent(s) => Some((s.as_str(), true)),
            _ => None,
        }
    }

    /// Convenience: returns true if this token represents a bare identifier.
    pub fn is_ident(&self) -> bool {
        matches!(self, TokenKind::Ident(_))
    }

    /// True for tokens that carry no structure: whitespace and comments.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Returns true if this token is structural punctuation.
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Semicolon
                | TokenKind::ParenOpen
                | TokenKind::ParenClose
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::keyword::Keyword;

    #[test]
    fn keyword_detection() {
        let tk = TokenKind::Keyword(Keyword::Select);
        assert!(tk.is_keyword(Keyword::Select));
        assert!(!tk.is_keyword(Keyword::From));
        assert!(tk.ident().is_none());
    }

    #[test]
    fn ident_access() {
        let tk = TokenKind::Ident("MyTable".into());
        assert!(tk.is_ident());
        assert_eq!(tk.ident(), Some("MyTable"));
        assert_eq!(tk.name_part(), Some(("MyTable", false)));
        assert!(!tk.is_punctuation());
    }

    #[test]
    fn quoted_ident_is_a_name_part_but_not_an_ident() {
        let tk = TokenKind::QuotedIdent("Pull_Request".into());
        assert!(!tk.is_ident());
        assert!(tk.ident().is_none());
        assert_eq!(tk.name_part(), Some(("Pull_Request", true)));
    }

    #[test]
    fn trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::StringLiteral.is_trivia());
        assert!(!TokenKind::Semicolon.is_trivia());
    }

    #[test]
    fn punctuation_classification() {
        assert!(TokenKind::Comma.is_punctuation());
        assert!(TokenKind::Dot.is_punctuation());
        assert!(TokenKind::Semicolon.is_punctuation());
        assert!(TokenKind::ParenOpen.is_punctuation());
        assert!(TokenKind::ParenClose.is_punctuation());
        assert!(!TokenKind::Ident("x".into()).is_punctuation());
        assert!(!TokenKind::Keyword(Keyword::From).is_punctuation());
    }

    #[test]
    fn other_variant() {
        let tk = TokenKind::Other('*');
        assert!(!tk.is_ident());
        assert!(!tk.is_punctuation());
        assert!(tk.name_part().is_none());
    }
}
