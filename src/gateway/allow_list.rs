use crate::*;
use itertools::Itertools as _;
use std::collections::HashSet;

/// The fixed set of relations a validated query may read.
///
/// Two groups: schema-qualified application tables, and schema-less metadata
/// relations (catalog views) readable regardless of schema context. Loaded
/// once, shared read-only for the lifetime of the gateway.
///
/// Case rules follow SQL quoting: a part written bare in the query is
/// compared case-insensitively, a part written in double quotes must match an
/// entry exactly.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    /// Entries exactly as configured.
    exact: HashSet<(String, String)>,
    /// Entries folded to lowercase, for bare lookups.
    folded: HashSet<(String, String)>,
    metadata_exact: HashSet<String>,
    metadata_folded: HashSet<String>,
}

impl AllowList {
    pub fn new<'a>(
        tables: impl IntoIterator<Item = (&'a str, &'a str)>,
        metadata: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut list = Self::default();
        for (schema, table) in tables {
            list.folded.insert((
                schema.to_ascii_lowercase(),
                table.to_ascii_lowercase(),
            ));
            list.exact.insert((schema.to_string(), table.to_string()));
        }
        for name in metadata {
            list.metadata_folded.insert(name.to_ascii_lowercase());
            list.metadata_exact.insert(name.to_string());
        }
        list
    }

    /// Parse `schema.table` entries, e.g. from a comma-separated setting.
    /// Blank entries are skipped; an unqualified entry is a configuration
    /// error. Metadata relations use the built-in default set.
    pub fn parse<'a>(entries: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut pairs = Vec::new();
        for raw in entries {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            let Some(pair) = entry.split_once('.') else {
                return Err(Error::Config(format!(
                    "allow-list entry `{entry}` is not schema-qualified"
                )));
            };
            pairs.push(pair);
        }
        Ok(Self::new(
            pairs,
            DEFAULT_METADATA_RELATIONS.iter().copied(),
        ))
    }

    /// Whether `schema.name` may be read. Each part follows its own quoting
    /// rule: quoted parts compare exactly, bare parts case-insensitively.
    pub fn permits_table(
        &self,
        schema: &str,
        schema_quoted: bool,
        name: &str,
        name_quoted: bool,
    ) -> bool {
        if !schema_quoted && !name_quoted {
            return self
                .folded
                .contains(&(schema.to_ascii_lowercase(), name.to_ascii_lowercase()));
        }
        self.exact
            .iter()
            .any(|(s, n)| part_matches(s, schema, schema_quoted) && part_matches(n, name, name_quoted))
    }

    /// Whether a bare `name` is a metadata relation, readable schema-less.
    pub fn permits_metadata(&self, name: &str, quoted: bool) -> bool {
        if quoted {
            self.metadata_exact.contains(name)
        } else {
            self.metadata_folded.contains(&name.to_ascii_lowercase())
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.metadata_exact.is_empty()
    }
}

fn part_matches(entry: &str, part: &str, quoted: bool) -> bool {
    if quoted {
        entry == part
    } else {
        entry.eq_ignore_ascii_case(part)
    }
}

impl std::fmt::Display for AllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tables = self
            .exact
            .iter()
            .map(|(s, n)| format!("{s}.{n}"))
            .sorted()
            .join(", ");
        f.write_str(&tables)
    }
}
