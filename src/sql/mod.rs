//! Typed SQL tokenization.
//!
//! This module groups the building blocks the gateway uses to reason about
//! untrusted SQL without a full parser:
//!
//! Modules:
//! - `keyword`    : Fixed vocabulary of structural and guarded keywords.
//! - `token_kind` : Classification of lexical atoms (identifiers, literals,
//!   comments, punctuation, keywords).
//! - `token`      : Token struct pairing a `TokenKind` with source span offsets.
//! - `tokenizer`  : Single pass O(n) tokenizer producing a `Vec<Token>` from raw SQL.
//!
//! Design Principles:
//! 1. Total coverage: every input byte belongs to exactly one token, so later
//!    stages can tell a keyword from the same word inside a literal or
//!    comment.
//! 2. Preserve original identifier casing; decode quoted identifiers once,
//!    here, so comparisons downstream are plain string equality.
//! 3. Keep the keyword vocabulary fixed and purposely bounded; unknown words
//!    are identifiers, which is what keeps table/column names immune to the
//!    keyword guard.
//!
//! Public Re-exports:
//! You can `use qgate::sql::{tokenize, Token, TokenKind, Keyword};` directly,
//! or pull everything via the `prelude` submodule.
//!
//! Example:
//! ```rust
//! use qgate::sql::prelude::*;
//!
//! let tokens = tokenize("SELECT a, b FROM my_table").unwrap();
//! assert!(tokens.iter().any(|t| t.is_keyword(Keyword::Select)));
//! assert!(tokens.iter().any(|t| t.ident() == Some("my_table")));
//! ```
//!
//! NOTE: This is **not** a full SQL parser. It classifies exactly as much as
//! the validation pipeline needs and no more.

pub mod keyword;
pub mod token;
pub mod token_kind;
pub mod tokenizer;

pub use keyword::Keyword;
pub use token::Token;
pub use token_kind::TokenKind;
pub use tokenizer::tokenize;

/// Convenience prelude re-exporting the most commonly used items.
///
/// Import with:
/// `use qgate::sql::prelude::*;`
pub mod prelude {
    pub use super::{Keyword, Token, TokenKind, tokenize};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_and_access() {
        let sql = "SELECT col FROM tbl";
        let tokens = tokenize(sql).expect("valid input");
        assert!(tokens.iter().any(|t| t.is_keyword(Keyword::Select)));
        assert!(tokens.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(tokens.iter().any(|t| t.ident() == Some("col")));
        assert!(tokens.iter().any(|t| t.ident() == Some("tbl")));
    }

    #[test]
    fn prelude_import_works() {
        use super::prelude::*;
        let toks = tokenize("FROM X").expect("valid input");
        assert!(toks.iter().any(|t| t.is_keyword(Keyword::From)));
        assert!(toks.iter().any(|t| t.ident() == Some("X")));
    }
}
