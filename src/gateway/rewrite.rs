use crate::*;

/// Schema-qualify bare relation references.
///
/// Splices `<default_schema>.` ahead of every reference that resolved under
/// the default schema, left to right by the spans recorded at resolution —
/// no re-tokenization, no pattern matching on raw text, so a table name that
/// also appears inside a string literal or as a column name is never
/// touched. Explicitly qualified, quoted, metadata, and CTE references pass
/// through unchanged, which is also what makes the rewrite idempotent: on
/// already-qualified output there is nothing left to do.
pub(crate) fn qualify(statement: &ValidatedStatement, default_schema: &str) -> String {
    let sql = statement.sql();
    let mut out = String::with_capacity(sql.len() + 16);
    let mut cursor = 0;
    for r in statement.relations() {
        if !r.needs_qualification() {
            continue;
        }
        out.push_str(&sql[cursor..r.start]);
        out.push_str(default_schema);
        out.push('.');
        cursor = r.start;
    }
    out.push_str(&sql[cursor..]);
    out
}
