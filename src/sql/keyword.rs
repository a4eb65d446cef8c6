//! SQL keyword vocabulary used by the tokenizer.
//!
//! The vocabulary covers two groups: the structural words the pipeline
//! steers by (SELECT/WITH/FROM/JOIN/LIMIT/...) and every statement verb the
//! keyword guard may be configured to reject. Words outside the vocabulary
//! tokenize as identifiers, which is what keeps the guard blind to table and
//! column names.
//!
//! Design notes:
//! - Keywords are matched case-insensitively via `from_lower` using a
//!   pre-lower-cased string slice.
//! - `as_str` provides the canonical lowercase form, which is also the form
//!   the configured forbidden-keyword set is compared against.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Structural
    Select,
    With,
    Recursive,
    From,
    Join,
    On,
    As,
    Where,
    Group,
    Order,
    By,
    Having,
    Limit,
    Offset,
    Union,
    Except,
    Intersect,
    Into,
    // Statement verbs subject to the keyword guard
    Insert,
    Update,
    Delete,
    Merge,
    Drop,
    Alter,
    Create,
    Truncate,
    Grant,
    Revoke,
    Copy,
    Vacuum,
    Analyze,
    Call,
    Do,
    Set,
    Reset,
    Lock,
    Reindex,
    Cluster,
    Comment,
    Listen,
    Notify,
    Prepare,
    Execute,
    Deallocate,
    Discard,
    Begin,
    Commit,
    Rollback,
    Savepoint,
    Release,
}

impl Keyword {
    /// Keywords that close an open FROM list at their parenthesis depth.
    /// `ON` is deliberately absent: a join condition does not end the list
    /// (`FROM a JOIN b ON x = y, c` is still one list).
    pub const TERMINATORS: [Self; 9] = [
        Keyword::Where,
        Keyword::Group,
        Keyword::Order,
        Keyword::Having,
        Keyword::Limit,
        Keyword::Offset,
        Keyword::Union,
        Keyword::Except,
        Keyword::Intersect,
    ];

    /// Attempt to classify a *lower-cased* word slice into a `Keyword`.
    /// Returns `None` if the word is not part of the vocabulary.
    ///
    /// NOTE: The caller is responsible for lower-casing the input. This avoids
    /// allocating new strings for each token; `to_ascii_lowercase` is typically
    /// performed once per word lexeme outside this function.
    pub fn from_lower(word: &str) -> Option<Self> {
        use Keyword::*;
        let kw = match word {
            "select" => Select,
            "with" => With,
            "recursive" => Recursive,
            "from" => From,
            "join" => Join,
            "on" => On,
            "as" => As,
            "where" => Where,
            "group" => Group,
            "order" => Order,
            "by" => By,
            "having" => Having,
            "limit" => Limit,
            "offset" => Offset,
            "union" => Union,
            "except" => Except,
            "intersect" => Intersect,
            "into" => Into,
            "insert" => Insert,
            "update" => Update,
            "delete" => Delete,
            "merge" => Merge,
            "drop" => Drop,
            "alter" => Alter,
            "create" => Create,
            "truncate" => Truncate,
            "grant" => Grant,
            "revoke" => Revoke,
            "copy" => Copy,
            "vacuum" => Vacuum,
            "analyze" => Analyze,
            "call" => Call,
            "do" => Do,
            "set" => Set,
            "reset" => Reset,
            "lock" => Lock,
            "reindex" => Reindex,
            "cluster" => Cluster,
            "comment" => Comment,
            "listen" => Listen,
            "notify" => Notify,
            "prepare" => Prepare,
            "execute" => Execute,
            "deallocate" => Deallocate,
            "discard" => Discard,
            "begin" => Begin,
            "commit" => Commit,
            "rollback" => Rollback,
            "savepoint" => Savepoint,
            "release" => Release,
            _ => return None,
        };
        Some(kw)
    }

    /// Canonical lowercase string form of the keyword.
    pub const fn as_str(self) -> &'static str {
        use Keyword::*;
        match self {
            Select => "select",
            With => "with",
            Recursive => "recursive",
            From => "from",
            Join => "join",
            On => "on",
            As => "as",
            Where => "where",
            Group => "group",
            Order => "order",
            By => "by",
            Having => "having",
            Limit => "limit",
            Offset => "offset",
            Union => "union",
            Except => "except",
            Intersect => "intersect",
            Into => "into",
            Insert => "insert",
            Update => "update",
            Delete => "delete",
            Merge => "merge",
            Drop => "drop",
            Alter => "alter",
            Create => "create",
            Truncate => "truncate",
            Grant => "grant",
            Revoke => "revoke",
            Copy => "copy",
            Vacuum => "vacuum",
            Analyze => "analyze",
            Call => "call",
            Do => "do",
            Set => "set",
            Reset => "reset",
            Lock => "lock",
            Reindex => "reindex",
            Cluster => "cluster",
            Comment => "comment",
            Listen => "listen",
            Notify => "notify",
            Prepare => "prepare",
            Execute => "execute",
            Deallocate => "deallocate",
            Discard => "discard",
            Begin => "begin",
            Commit => "commit",
            Rollback => "rollback",
            Savepoint => "savepoint",
            Release => "release",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
