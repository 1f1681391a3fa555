// ABOUTME: Pagination and sorting utilities for list endpoints
// ABOUTME: Validates page/sort input, derives LIMIT/OFFSET/ORDER BY parts and page metadata

use serde::Serialize;

use crate::validator::{permitted_value, Validator};

/// Default page size for paginated queries
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size to prevent performance issues
pub const MAX_PAGE_SIZE: i64 = 100;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: i64 = 1;

/// Highest page number a client may request
pub const MAX_PAGE: i64 = 10_000_000;

/// Requested page, page size and sort order for a list query.
///
/// `sort_safelist` is a static table of permitted sort tokens. Every column
/// name that ends up in SQL text is taken from this table, never from `sort`.
#[derive(Debug, Clone)]
pub struct Filters {
    pub page: i64,
    pub page_size: i64,
    pub sort: String,
    pub sort_safelist: &'static [&'static str],
}

/// ORDER BY direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl Filters {
    pub fn new(
        page: i64,
        page_size: i64,
        sort: impl Into<String>,
        sort_safelist: &'static [&'static str],
    ) -> Self {
        Self {
            page,
            page_size,
            sort: sort.into(),
            sort_safelist,
        }
    }

    /// Column named by `sort`, with any leading `-` removed.
    ///
    /// # Panics
    ///
    /// Panics if `sort` is not in the safelist. [`validate_filters`] rejects
    /// such input, so reaching this is a caller bug.
    pub fn sort_column(&self) -> &'static str {
        for safe in self.sort_safelist {
            if self.sort == *safe {
                return safe.strip_prefix('-').unwrap_or(safe);
            }
        }

        panic!("unsafe sort parameter: {}", self.sort);
    }

    pub fn sort_direction(&self) -> SortDirection {
        if self.sort.starts_with('-') {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    /// SQL LIMIT value; only meaningful once the filters validated
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// SQL OFFSET value; only meaningful once the filters validated
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }

    pub fn metadata(&self, total_records: i64) -> Metadata {
        Metadata::calculate(total_records, self.page, self.page_size)
    }
}

/// Checks page bounds and that `sort` is safelisted.
pub fn validate_filters(v: &mut Validator, filters: &Filters) {
    v.check(filters.page >= MIN_PAGE, "page", "must be greater than zero");
    v.check(
        filters.page <= MAX_PAGE,
        "page",
        "must be a maximum of 10 million",
    );
    v.check(filters.page_size > 0, "page_size", "must be greater than zero");
    v.check(
        filters.page_size <= MAX_PAGE_SIZE,
        "page_size",
        "must be a maximum of 100",
    );
    v.check(
        permitted_value(&filters.sort.as_str(), filters.sort_safelist),
        "sort",
        "invalid sort value",
    );
}

/// Metadata about pagination state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub current_page: i64,
    pub page_size: i64,
    pub first_page: i64,
    pub last_page: i64,
    pub total_records: i64,
}

impl Metadata {
    /// All fields are zero when there are no records.
    pub fn calculate(total_records: i64, page: i64, page_size: i64) -> Self {
        if total_records == 0 || page_size <= 0 {
            return Metadata::default();
        }

        Self {
            current_page: page,
            page_size,
            first_page: MIN_PAGE,
            last_page: (total_records + page_size - 1) / page_size,
            total_records,
        }
    }
}
