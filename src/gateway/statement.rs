use crate::*;

/// A statement that survived the whole validation pipeline: tokenization,
/// classification, keyword guard, and relation resolution.
///
/// Fields are private and the constructor is crate-internal, so a value of
/// this type is itself the proof that every check passed — there is no way
/// to hold a `ValidatedStatement` for a statement that was rejected.
#[derive(Debug, Clone)]
pub struct ValidatedStatement {
    sql: String,
    kind: StatementKind,
    relations: Vec<RelationRef>,
    limit: Option<u64>,
}

impl ValidatedStatement {
    pub(crate) fn new(
        sql: String,
        kind: StatementKind,
        relations: Vec<RelationRef>,
        limit: Option<u64>,
    ) -> Self {
        Self {
            sql,
            kind,
            relations,
            limit,
        }
    }

    /// The original statement text, exactly as validated.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    /// Relation references in source order.
    pub fn relations(&self) -> &[RelationRef] {
        &self.relations
    }

    /// The trailing `LIMIT n` the caller wrote, if any.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}
