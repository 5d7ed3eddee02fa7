// Client-side search and status filtering over a fetched table.

use crate::model::{Record, RecordId, StatusKind};

/// Status filter; `All` matches every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: StatusKind> StatusFilter<S> {
    /// `"all"` or a wire status value.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw == "all" {
            Some(Self::All)
        } else {
            S::from_wire(raw).map(Self::Only)
        }
    }

    pub fn matches(self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

/// Case-insensitive substring match over any of `fields`; an empty
/// needle matches everything.
pub fn matches_search(fields: &[&str], needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let needle = needle.to_lowercase();
    fields
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Fetched rows plus the current search text and status filter.
#[derive(Debug, Clone)]
pub struct ListView<R: Record> {
    rows: Vec<R>,
    search: String,
    filter: StatusFilter<R::Status>,
}

impl<R: Record> Default for ListView<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            search: String::new(),
            filter: StatusFilter::All,
        }
    }
}

impl<R: Record> ListView<R> {
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_filter(&mut self, filter: StatusFilter<R::Status>) {
        self.filter = filter;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filter(&self) -> StatusFilter<R::Status> {
        self.filter
    }

    /// Every fetched row, unfiltered.
    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn find(&self, id: RecordId) -> Option<&R> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// Rows passing both search and status filter, in fetch order.
    pub fn visible(&self) -> Vec<&R> {
        self.rows
            .iter()
            .filter(|r| self.filter.matches(r.status()))
            .filter(|r| matches_search(&r.search_fields(), &self.search))
            .collect()
    }
}
