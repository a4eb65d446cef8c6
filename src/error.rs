//! Gateway error taxonomy.
//!
//! Every violation a statement can commit maps to exactly one variant, and
//! every stage fails fast with the first violation it finds. Nothing here is
//! fatal to the process: callers receive these as values, never as panics.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The tokenizer could not close a string literal, quoted identifier, or
    /// block comment before end of input.
    #[error("unterminated {construct} starting at byte {offset}")]
    MalformedInput {
        construct: &'static str,
        offset: usize,
    },

    #[error("only SELECT or WITH (CTE) queries are allowed")]
    DisallowedStatementType,

    #[error("multiple SQL statements are not allowed")]
    MultipleStatements,

    #[error("forbidden keyword `{0}`")]
    ForbiddenKeyword(String),

    /// `schema` is the effective schema the lookup ran under: the written
    /// one for qualified references, the configured default for bare ones.
    #[error("access to table `{schema}.{name}` is not allowed")]
    UnauthorizedTable { schema: String, name: String },

    #[error("invalid pagination: {0}")]
    MalformedPagination(String),

    #[error("query execution failed: {0}")]
    Execution(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T = ()> = std::result::Result<T, Error>;
