use crate::*;
use crate::sql::prelude::*;

/// Caller-facing pagination window.
///
/// `page` is 1-based; `page_size` is capped at the configured maximum at
/// construction, so the value carried here is always the one that will be
/// emitted. The caller's raw numbers are never used directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSpec {
    page: u64,
    page_size: u64,
}

impl PaginationSpec {
    /// Validate and cap the caller-supplied window. Non-positive input is a
    /// `MalformedPagination` error; an oversized `page_size` is clamped to
    /// `max_page_size`.
    pub fn new(page: i64, page_size: i64, max_page_size: u64) -> Result<Self> {
        if page < 1 {
            return Err(Error::MalformedPagination(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if page_size < 1 {
            return Err(Error::MalformedPagination(format!(
                "page_size must be >= 1, got {page_size}"
            )));
        }
        Ok(Self {
            page: page as u64,
            page_size: (page_size as u64).min(max_page_size),
        })
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    /// The effective (capped) page size.
    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Rows to skip: `(page - 1) * page_size`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// Bound the rewritten statement to one page.
///
/// A trailing `LIMIT n` is replaced with `LIMIT min(n, page_size)`;
/// otherwise `LIMIT page_size` is appended. `OFFSET` is then always
/// appended, and any trailing `;` (plus trailing trivia) is dropped so the
/// clauses attach to the statement proper. Purely textual: this function
/// never touches the database.
pub(crate) fn paginate(sql: &str, spec: PaginationSpec) -> Result<String> {
    let tokens = tokenize(sql)?;
    let mut tail: Vec<&Token> = tokens.iter().filter(|t| !t.is_trivia()).collect();
    if matches!(tail.last().map(|t| &t.kind), Some(TokenKind::Semicolon)) {
        tail.pop();
    }
    let Some(last) = tail.last() else {
        return Err(Error::MalformedPagination("empty statement".into()));
    };

    let trailing_limit = tail.len().checked_sub(2).and_then(|i| {
        match (&tail[i].kind, &tail[i + 1].kind) {
            (TokenKind::Keyword(Keyword::Limit), TokenKind::Number(n)) => {
                Some((tail[i + 1], n.parse::<u64>().ok()?))
            }
            _ => None,
        }
    });

    let mut out = match trailing_limit {
        Some((number, existing)) => {
            let mut out = sql[..number.start].to_string();
            out.push_str(&existing.min(spec.page_size()).to_string());
            out
        }
        None => {
            let mut out = sql[..last.end].to_string();
            out.push_str(" LIMIT ");
            out.push_str(&spec.page_size().to_string());
            out
        }
    };
    out.push_str(" OFFSET ");
    out.push_str(&spec.offset().to_string());
    Ok(out)
}
