use crate::*;
use crate::sql::prelude::*;

/// Shape of a statement the gateway is willing to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum StatementKind {
    #[display("SELECT")]
    Select,
    #[display("WITH ... SELECT")]
    CteSelect,
}

/// Classifier output: the statement shape plus the trailing `LIMIT` value,
/// captured here so pagination can cap it later without a second analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Classified {
    pub kind: StatementKind,
    pub limit: Option<u64>,
}

/// Determine the statement shape and reject multi-statement input.
///
/// The first non-trivial token must be `SELECT` or `WITH`; anything else
/// (including an empty stream) is `DisallowedStatementType`. Statement
/// separation is token-level: a `;` inside a string literal or comment never
/// shows up here, and one trailing `;` followed only by trivia is tolerated.
pub(crate) fn classify(tokens: &[Token]) -> Result<Classified> {
    let nontrivial: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();

    let kind = match nontrivial.first().map(|t| &t.kind) {
        Some(TokenKind::Keyword(Keyword::Select)) => StatementKind::Select,
        Some(TokenKind::Keyword(Keyword::With)) => StatementKind::CteSelect,
        _ => return Err(Error::DisallowedStatementType),
    };

    for (idx, t) in nontrivial.iter().enumerate() {
        if t.kind == TokenKind::Semicolon && idx + 1 < nontrivial.len() {
            return Err(Error::MultipleStatements);
        }
    }

    Ok(Classified {
        kind,
        limit: trailing_limit(&nontrivial),
    })
}

/// The value of a `LIMIT n` sitting at the very end of the statement
/// (ignoring one trailing `;`), if any.
fn trailing_limit(nontrivial: &[&Token]) -> Option<u64> {
    let mut tail = nontrivial;
    if matches!(tail.last().map(|t| &t.kind), Some(TokenKind::Semicolon)) {
        tail = &tail[..tail.len() - 1];
    }
    let [.., kw, num] = tail else { return None };
    if !kw.is_keyword(Keyword::Limit) {
        return None;
    }
    match &num.kind {
        TokenKind::Number(n) => n.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn classify_sql(sql: &str) -> Result<Classified> {
        classify(&tokenize(sql).expect("tokenize should succeed"))
    }

    #[rstest]
    #[case("SELECT 1", StatementKind::Select)]
    #[case("  select * from t  ", StatementKind::Select)]
    #[case("-- note\nSELECT 1", StatementKind::Select)]
    #[case("WITH x AS (SELECT 1) SELECT * FROM x", StatementKind::CteSelect)]
    fn accepts_select_and_cte(#[case] sql: &str, #[case] expected: StatementKind) {
        let classified = classify_sql(sql).expect("should classify");
        assert_eq!(classified.kind, expected);
    }

    #[rstest]
    #[case("DELETE FROM insightly.pull_request")]
    #[case("INSERT INTO t VALUES (1)")]
    #[case("EXPLAIN SELECT 1")]
    #[case("")]
    #[case("   -- only a comment")]
    fn rejects_non_select_roots(#[case] sql: &str) {
        assert!(matches!(
            classify_sql(sql),
            Err(Error::DisallowedStatementType)
        ));
    }

    #[test]
    fn rejects_piggybacked_statement() {
        assert!(matches!(
            classify_sql("SELECT 1; DROP TABLE x"),
            Err(Error::MultipleStatements)
        ));
    }

    #[test]
    fn rejects_double_semicolon() {
        assert!(matches!(
            classify_sql("SELECT 1;;"),
            Err(Error::MultipleStatements)
        ));
    }

    #[test]
    fn tolerates_one_trailing_semicolon() {
        assert!(classify_sql("SELECT 1;").is_ok());
        assert!(classify_sql("SELECT 1; -- done").is_ok());
    }

    #[test]
    fn semicolon_inside_literal_is_no_separator() {
        assert!(classify_sql("SELECT 'a; DROP TABLE x'").is_ok());
    }

    #[rstest]
    #[case("SELECT * FROM t", None)]
    #[case("SELECT * FROM t LIMIT 10", Some(10))]
    #[case("SELECT * FROM t LIMIT 10;", Some(10))]
    #[case("SELECT * FROM (SELECT 1 LIMIT 3) x", None)]
    fn captures_trailing_limit(#[case] sql: &str, #[case] expected: Option<u64>) {
        assert_eq!(classify_sql(sql).expect("should classify").limit, expected);
    }
}
