use crate::*;
use crate::sql::prelude::*;
use std::collections::HashSet;

/// Reject destructive keywords and caller-embedded `OFFSET`.
///
/// Only `Keyword`-classified tokens are inspected. Identifiers, quoted
/// identifiers, string literals, and comments were separated by the
/// tokenizer, so a table named `"update_log"` or a literal containing the
/// word `delete` can never trip this scan. `OFFSET` is rejected here too:
/// pagination is exclusively the gateway's responsibility, and catching it
/// during validation means the validation-only entry point reports it as
/// well.
pub(crate) fn scan_keywords(tokens: &[Token], forbidden: &HashSet<String>) -> Result {
    for t in tokens {
        let TokenKind::Keyword(kw) = &t.kind else {
            continue;
        };
        if *kw == Keyword::Offset {
            return Err(Error::MalformedPagination(
                "OFFSET is managed by the gateway and may not appear in the query".into(),
            ));
        }
        if forbidden.contains(kw.as_str()) {
            return Err(Error::ForbiddenKeyword(kw.as_str().to_string()));
        }
    }
    Ok(())
}
