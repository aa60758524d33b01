use sea_orm::Order;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{PageRequest, PageResult};
use crate::schema::FieldType;

/// Index used when the requested page is missing or not positive
pub const DEFAULT_PAGE_INDEX: i64 = 0;
/// Size used when the requested page size is missing or not above one
pub const DEFAULT_PAGE_SIZE: i64 = 1;
/// Largest offset a signed 64-bit SQL parameter can hold
const MAX_OFFSET: u64 = i64::MAX.unsigned_abs();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `DESC` in any case is descending; anything else, including nothing, is ascending.
    #[must_use]
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            Some(raw) if raw.trim().eq_ignore_ascii_case("DESC") => Self::Desc,
            _ => Self::Asc,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SortDirection> for Order {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Asc => Self::Asc,
            SortDirection::Desc => Self::Desc,
        }
    }
}

/// One `ORDER BY` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
    /// Declared type of the field, filled in once the schema has been consulted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
}

/// Backend-neutral description of the page to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page_index: u64,
    pub page_size: u64,
    pub order_by: Vec<SortField>,
}

impl PageQuery {
    /// Build the page to fetch from a client request, repairing it first.
    #[must_use]
    pub fn from_request(request: &PageRequest) -> Self {
        let request = normalize(request.clone());
        let direction = SortDirection::parse(request.sort_direction.as_deref());

        Self {
            page_index: request
                .page_index
                .map_or(0, |index| u64::try_from(index).unwrap_or(0)),
            page_size: request
                .page_size
                .map_or(1, |size| u64::try_from(size).unwrap_or(1)),
            order_by: request
                .sort_fields
                .unwrap_or_default()
                .into_iter()
                .map(|field| SortField {
                    field,
                    direction,
                    field_type: None,
                })
                .collect(),
        }
    }

    /// Number of rows to skip, capped at `i64::MAX` so SQL backends can bind it
    #[must_use]
    pub const fn offset(&self) -> u64 {
        let offset = self.page_index.saturating_mul(self.page_size);
        if offset > MAX_OFFSET { MAX_OFFSET } else { offset }
    }

    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.page_size
    }
}

impl PageRequest {
    /// Repair the request in place.
    ///
    /// - `page_index` keeps positive values, everything else becomes 0
    /// - `page_size` keeps values above 1, everything else becomes 1
    /// - without sort fields, both sort fields and direction are cleared;
    ///   otherwise the direction becomes `ASC` or `DESC`
    ///
    /// Never fails and is idempotent.
    pub fn normalize(&mut self) {
        if !self.page_index.is_some_and(|index| index > 0) {
            if self.page_index.is_some_and(|index| index != DEFAULT_PAGE_INDEX) {
                tracing::trace!(page = ?self.page_index, "Resetting page index");
            }
            self.page_index = Some(DEFAULT_PAGE_INDEX);
        }

        if !self.page_size.is_some_and(|size| size > 1) {
            if self.page_size.is_some_and(|size| size != DEFAULT_PAGE_SIZE) {
                tracing::trace!(size = ?self.page_size, "Resetting page size");
            }
            self.page_size = Some(DEFAULT_PAGE_SIZE);
        }

        if self.sort_fields.as_ref().is_none_or(Vec::is_empty) {
            self.sort_fields = None;
            self.sort_direction = None;
        } else {
            let direction = SortDirection::parse(self.sort_direction.as_deref());
            self.sort_direction = Some(direction.as_str().to_string());
        }
    }

    /// Repaired sort direction, or `None` when the request is unsorted
    #[must_use]
    pub fn direction(&self) -> Option<SortDirection> {
        self.sort_fields
            .as_ref()
            .filter(|fields| !fields.is_empty())
            .map(|_| SortDirection::parse(self.sort_direction.as_deref()))
    }
}

/// By-value form of [`PageRequest::normalize`].
#[must_use]
pub fn normalize(mut request: PageRequest) -> PageRequest {
    request.normalize();
    request
}

impl PageResult {
    /// Wrap backend page metadata for the client. No validation is applied.
    #[must_use]
    pub const fn summarize(
        total_pages: u64,
        total_element_count: u64,
        echoed_request: PageRequest,
    ) -> Self {
        Self {
            total_pages,
            total_element_count,
            echoed_request,
        }
    }

    /// Summarize from an element count alone, deriving the page count from
    /// the request's page size.
    #[must_use]
    pub fn from_total(total_element_count: u64, echoed_request: PageRequest) -> Self {
        let page_size = echoed_request
            .page_size
            .and_then(|size| u64::try_from(size).ok())
            .filter(|size| *size > 0)
            .unwrap_or(1);

        Self::summarize(
            total_element_count.div_ceil(page_size),
            total_element_count,
            echoed_request,
        )
    }
}

/// Free-function form of [`PageResult::summarize`].
#[must_use]
pub const fn summarize(
    total_pages: u64,
    total_element_count: u64,
    original_request: PageRequest,
) -> PageResult {
    PageResult::summarize(total_pages, total_element_count, original_request)
}
