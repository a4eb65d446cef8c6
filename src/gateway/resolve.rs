use crate::*;
use crate::sql::prelude::*;
use std::collections::HashSet;

/// How a relation reference resolved against the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// Schema written out in the query; left untouched by the rewriter.
    Qualified,
    /// Bare name resolved under the default schema; the rewriter qualifies it.
    DefaultSchema,
    /// Catalog / information view, readable schema-less.
    Metadata,
    /// Name declared by the statement's leading WITH clause.
    Cte,
}

/// A table reference found after `FROM`, `JOIN`, or a comma in a FROM list.
///
/// `start..end` spans the whole written reference (including quotes and an
/// explicit schema part) in the original statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef {
    pub schema: Option<String>,
    pub name: String,
    /// True when the name part was double-quoted in the source.
    pub quoted: bool,
    pub(crate) schema_quoted: bool,
    pub start: usize,
    pub end: usize,
    binding: Binding,
}

impl RelationRef {
    pub fn binding(&self) -> Binding {
        self.binding
    }

    /// True when the rewriter should prefix the default schema.
    pub(crate) fn needs_qualification(&self) -> bool {
        self.binding == Binding::DefaultSchema && self.schema.is_none() && !self.quoted
    }
}

impl std::fmt::Display for RelationRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Walk the token stream for relation references and check each against the
/// allow-list.
///
/// The walk is linear and parenthesis-depth aware, in the same spirit as the
/// FROM-clause extraction used for completion engines: `FROM` opens a
/// relation list at the current depth, a comma at that depth introduces
/// another item, `JOIN` always introduces one, and `WHERE`/`GROUP`/`ORDER`/
/// set-operation keywords close the list again. Subqueries need no special
/// casing: their own `FROM` opens a list one level deeper, so a relation
/// hidden three subqueries down is still checked.
///
/// Returns the references in source order, each with its binding assigned,
/// or `UnauthorizedTable` for the first reference not on the allow-list.
pub(crate) fn resolve(tokens: &[Token], config: &GatewayConfig) -> Result<Vec<RelationRef>> {
    let ctes = cte_names(tokens);
    let mut refs = Vec::new();
    let mut depth: i32 = 0;
    let mut open_lists: Vec<i32> = Vec::new();

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i].kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => {
                open_lists.retain(|&d| d < depth);
                depth -= 1;
            }
            TokenKind::Keyword(Keyword::From) => {
                if !open_lists.contains(&depth) {
                    open_lists.push(depth);
                }
                i = parse_relation(tokens, i, &mut refs);
                continue;
            }
            TokenKind::Keyword(Keyword::Join) => {
                i = parse_relation(tokens, i, &mut refs);
                continue;
            }
            TokenKind::Comma if open_lists.contains(&depth) => {
                i = parse_relation(tokens, i, &mut refs);
                continue;
            }
            TokenKind::Keyword(k) if Keyword::TERMINATORS.contains(k) => {
                open_lists.retain(|&d| d != depth);
            }
            _ => {}
        }
        i += 1;
    }

    for r in &mut refs {
        authorize(r, &ctes, config)?;
    }
    Ok(refs)
}

/// Parse one `[schema.]name` reference following the token at `after`.
/// Returns the index the main walk should resume at. A parenthesized
/// subquery (or anything else that is not a name) is left for the main walk.
fn parse_relation(tokens: &[Token], after: usize, out: &mut Vec<RelationRef>) -> usize {
    let Some(i) = next_nontrivial(tokens, after + 1) else {
        return after + 1;
    };
    let Some((first, first_quoted)) = tokens[i].name_part() else {
        return i;
    };

    if let Some(dot) = next_nontrivial(tokens, i + 1) {
        if tokens[dot].kind == TokenKind::Dot {
            if let Some(part) = next_nontrivial(tokens, dot + 1) {
                if let Some((name, quoted)) = tokens[part].name_part() {
                    out.push(RelationRef {
                        schema: Some(first.to_string()),
                        schema_quoted: first_quoted,
                        name: name.to_string(),
                        quoted,
                        start: tokens[i].start,
                        end: tokens[part].end,
                        binding: Binding::Qualified,
                    });
                    return part + 1;
                }
            }
            // dangling dot; nothing referencable
            return dot + 1;
        }
    }

    out.push(RelationRef {
        schema: None,
        schema_quoted: false,
        name: first.to_string(),
        quoted: first_quoted,
        start: tokens[i].start,
        end: tokens[i].end,
        binding: Binding::DefaultSchema,
    });
    i + 1
}

fn next_nontrivial(tokens: &[Token], from: usize) -> Option<usize> {
    (from..tokens.len()).find(|&i| !tokens[i].is_trivia())
}

fn authorize(r: &mut RelationRef, ctes: &HashSet<String>, config: &GatewayConfig) -> Result {
    if let Some(schema) = &r.schema {
        if config
            .allow_list
            .permits_table(schema, r.schema_quoted, &r.name, r.quoted)
        {
            r.binding = Binding::Qualified;
            return Ok(());
        }
        return Err(Error::UnauthorizedTable {
            schema: schema.clone(),
            name: r.name.clone(),
        });
    }
    if ctes.contains(&normalized(&r.name, r.quoted)) {
        r.binding = Binding::Cte;
        return Ok(());
    }
    if config.allow_list.permits_metadata(&r.name, r.quoted) {
        r.binding = Binding::Metadata;
        return Ok(());
    }
    if config
        .allow_list
        .permits_table(&config.default_schema, false, &r.name, r.quoted)
    {
        r.binding = Binding::DefaultSchema;
        return Ok(());
    }
    Err(Error::UnauthorizedTable {
        schema: config.default_schema.clone(),
        name: r.name.clone(),
    })
}

/// SQL name folding: bare names compare lowercase, quoted names exactly.
fn normalized(name: &str, quoted: bool) -> String {
    if quoted {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Collect the names declared by a leading `WITH [RECURSIVE]` clause.
///
/// Only the statement head is inspected: `name [(columns)] AS (...)`,
/// comma-separated. Bodies are skipped by bracket matching; the main walk
/// still checks every relation inside them. A WITH nested inside a subquery
/// is not collected, so its names fall through to the allow-list (closed).
fn cte_names(tokens: &[Token]) -> HashSet<String> {
    let nt: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
    let mut names = HashSet::new();
    if !nt.first().is_some_and(|t| t.is_keyword(Keyword::With)) {
        return names;
    }
    let mut i = 1;
    if nt.get(i).is_some_and(|t| t.is_keyword(Keyword::Recursive)) {
        i += 1;
    }
    loop {
        let Some((name, quoted)) = nt.get(i).and_then(|t| t.name_part()) else {
            break;
        };
        let declared = normalized(name, quoted);
        i += 1;
        // optional column list: name (a, b) AS (...)
        if nt.get(i).is_some_and(|t| t.kind == TokenKind::ParenOpen) {
            i = skip_group(&nt, i);
        }
        if !nt.get(i).is_some_and(|t| t.is_keyword(Keyword::As)) {
            break;
        }
        i += 1;
        // MATERIALIZED / NOT MATERIALIZED lex as identifiers
        while nt.get(i).is_some_and(|t| t.kind.is_ident()) {
            i += 1;
        }
        if !nt.get(i).is_some_and(|t| t.kind == TokenKind::ParenOpen) {
            break;
        }
        names.insert(declared);
        i = skip_group(&nt, i);
        if nt.get(i).is_some_and(|t| t.kind == TokenKind::Comma) {
            i += 1;
            continue;
        }
        break;
    }
    names
}

/// Index just past the group opened by the parenthesis at `open`.
fn skip_group(nt: &[&Token], open: usize) -> usize {
    let mut depth = 0i32;
    let mut i = open;
    while let Some(t) = nt.get(i) {
        match &t.kind {
            TokenKind::ParenOpen => depth += 1,
            TokenKind::ParenClose => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn resolve_sql(sql: &str) -> Result<Vec<RelationRef>> {
        resolve(
            &tokenize(sql).expect("tokenize should succeed"),
            &GatewayConfig::default(),
        )
    }

    fn names(refs: &[RelationRef]) -> Vec<String> {
        refs.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn bare_reference_resolves_under_default_schema() {
        let refs = resolve_sql("SELECT id FROM pull_request").expect("allowed");
        assert_eq!(names(&refs), ["pull_request"]);
        assert_eq!(refs[0].binding(), Binding::DefaultSchema);
        assert!(refs[0].needs_qualification());
    }

    #[test]
    fn join_references_are_collected_in_order() {
        let refs = resolve_sql(
            "SELECT * FROM pull_request p JOIN pr_diff d ON p.id = d.pull_request_id",
        )
        .expect("allowed");
        assert_eq!(names(&refs), ["pull_request", "pr_diff"]);
    }

    #[test]
    fn reserved_word_tables_require_quoting() {
        // `commit` is allow-listed but lexes as a keyword, exactly as the
        // backend itself treats it: only the quoted form is referencable.
        let refs = resolve_sql("SELECT * FROM \"commit\"").expect("allowed");
        assert_eq!(refs[0].binding(), Binding::DefaultSchema);
        assert!(!refs[0].needs_qualification());
    }

    #[test]
    fn qualified_reference_is_left_as_written() {
        let refs = resolve_sql("SELECT * FROM insightly.pull_request").expect("allowed");
        assert_eq!(refs[0].binding(), Binding::Qualified);
        assert!(!refs[0].needs_qualification());
    }

    #[test]
    fn qualification_tolerates_spacing() {
        let refs = resolve_sql("SELECT * FROM insightly . pull_request").expect("allowed");
        assert_eq!(names(&refs), ["insightly.pull_request"]);
    }

    #[rstest]
    #[case("SELECT * FROM secrets", "insightly", "secrets")]
    #[case("SELECT * FROM other.pull_request", "other", "pull_request")]
    #[case("SELECT * FROM pull_request JOIN audit ON true", "insightly", "audit")]
    fn unauthorized_reference_fails(
        #[case] sql: &str,
        #[case] schema: &str,
        #[case] name: &str,
    ) {
        match resolve_sql(sql) {
            Err(Error::UnauthorizedTable { schema: s, name: n }) => {
                assert_eq!((s.as_str(), n.as_str()), (schema, name));
            }
            other => panic!("expected UnauthorizedTable, got {other:?}"),
        }
    }

    #[test]
    fn quoted_mixed_case_must_match_exactly() {
        // The allow-list holds lowercase `pull_request`; a quoted identifier
        // is case-sensitive, so this is a different (and unknown) relation.
        assert!(matches!(
            resolve_sql("SELECT * FROM \"Pull_Request\""),
            Err(Error::UnauthorizedTable { .. })
        ));
        // Quoted but matching exactly passes, and is never rewritten.
        let refs = resolve_sql("SELECT * FROM \"pull_request\"").expect("allowed");
        assert!(!refs[0].needs_qualification());
    }

    #[test]
    fn comma_separated_from_list_checks_every_item() {
        let refs = resolve_sql("SELECT * FROM pull_request, pr_diff").expect("allowed");
        assert_eq!(names(&refs), ["pull_request", "pr_diff"]);

        assert!(matches!(
            resolve_sql("SELECT * FROM (SELECT 1) a, secrets"),
            Err(Error::UnauthorizedTable { .. })
        ));
    }

    #[test]
    fn select_list_commas_do_not_open_a_relation_list() {
        let refs = resolve_sql("SELECT id, title, state FROM pull_request").expect("allowed");
        assert_eq!(names(&refs), ["pull_request"]);
    }

    #[test]
    fn where_clause_closes_the_list() {
        let refs = resolve_sql(
            "SELECT * FROM pull_request WHERE repoid IN (1, 2) ORDER BY createdon, id",
        )
        .expect("allowed");
        assert_eq!(names(&refs), ["pull_request"]);
    }

    #[test]
    fn nested_subquery_relations_are_checked() {
        let refs = resolve_sql(
            "SELECT * FROM pull_request WHERE id IN (SELECT pull_request_id FROM pr_diff)",
        )
        .expect("allowed");
        assert_eq!(names(&refs), ["pull_request", "pr_diff"]);

        assert!(matches!(
            resolve_sql("SELECT * FROM pull_request WHERE id IN (SELECT id FROM secrets)"),
            Err(Error::UnauthorizedTable { .. })
        ));
    }

    #[test]
    fn metadata_relations_resolve_schema_less() {
        let refs = resolve_sql("SELECT tablename FROM pg_tables").expect("allowed");
        assert_eq!(refs[0].binding(), Binding::Metadata);
        assert!(!refs[0].needs_qualification());
    }

    #[test]
    fn information_schema_views_are_ordinary_entries() {
        let refs =
            resolve_sql("SELECT table_name FROM information_schema.tables").expect("allowed");
        assert_eq!(refs[0].binding(), Binding::Qualified);
    }

    #[test]
    fn cte_names_are_exempt_but_bodies_are_checked() {
        let refs = resolve_sql(
            "WITH recent AS (SELECT * FROM pull_request) SELECT * FROM recent JOIN pr_diff ON true",
        )
        .expect("allowed");
        assert_eq!(names(&refs), ["pull_request", "recent", "pr_diff"]);
        assert_eq!(refs[1].binding(), Binding::Cte);
        assert!(!refs[1].needs_qualification());

        assert!(matches!(
            resolve_sql("WITH recent AS (SELECT * FROM secrets) SELECT * FROM recent"),
            Err(Error::UnauthorizedTable { .. })
        ));
    }

    #[test]
    fn cte_reference_folds_case_like_any_bare_name() {
        let refs = resolve_sql("WITH recent AS (SELECT 1) SELECT * FROM RECENT").expect("allowed");
        assert_eq!(refs[0].binding(), Binding::Cte);
    }

    #[test]
    fn multiple_ctes_with_column_lists() {
        let refs = resolve_sql(
            "WITH a (x) AS (SELECT id FROM pull_request), b AS (SELECT * FROM a) \
             SELECT * FROM b JOIN a ON true",
        )
        .expect("allowed");
        assert_eq!(names(&refs), ["pull_request", "a", "b", "a"]);
    }

    #[test]
    fn undeclared_name_is_not_a_cte() {
        // `WITH` appears, but the referenced name was never declared.
        assert!(matches!(
            resolve_sql("WITH recent AS (SELECT 1) SELECT * FROM older"),
            Err(Error::UnauthorizedTable { .. })
        ));
    }
}
