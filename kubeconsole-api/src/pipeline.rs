//! Sort, paginate and project
//!
//! The list pipeline works on a fully fetched, in-memory collection of one
//! kind. Ordering is driven by typed comparators declared per kind; the page
//! window is clamped so out-of-range starts yield empty pages, never errors.

use kubeconsole_common::ResourceRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::ops::Range;

/// Orders two objects of one kind by a single column
pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// A sortable column and its comparator
pub struct OrderField<T> {
    pub id: &'static str,
    pub compare: Comparator<T>,
}

impl<T> OrderField<T> {
    pub fn new(id: &'static str, compare: Comparator<T>) -> Self {
        Self { id, compare }
    }
}

impl<T> Clone for OrderField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for OrderField<T> {}

impl<T> std::fmt::Debug for OrderField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderField").field("id", &self.id).finish()
    }
}

/// Wire values: `"0"` applies the comparator as is, `"1"` reverses the
/// ascending result afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    #[serde(rename = "0")]
    Forward,
    #[serde(rename = "1")]
    Reversed,
}

impl OrderDirection {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(Self::Forward),
            "1" => Some(Self::Reversed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "0",
            Self::Reversed => "1",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reversed,
            Self::Reversed => Self::Forward,
        }
    }
}

/// Column metadata of a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub id: &'static str,
    pub title: &'static str,
}

impl Column {
    pub const fn new(id: &'static str, title: &'static str) -> Self {
        Self { id, title }
    }
}

/// Request-side list parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub start: usize,
    pub order_field: Option<String>,
    pub direction: Option<String>,
    pub search_content: Option<String>,
}

impl ListParams {
    /// Trimmed, non-empty search text
    pub fn search_term(&self) -> Option<&str> {
        self.search_content
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// One page of a list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListPage {
    pub total: usize,
    pub rows: Vec<ResourceRow>,
}

impl ListPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Requested order field if declared, else the default, else the first field
pub fn resolve_order_field<'a, T>(
    fields: &'a [OrderField<T>],
    requested: Option<&str>,
    default_field: &str,
) -> Option<&'a OrderField<T>> {
    let find = |id: &str| fields.iter().find(|field| field.id == id);
    requested
        .map(str::trim)
        .and_then(find)
        .or_else(|| find(default_field))
        .or_else(|| fields.first())
}

pub fn resolve_direction(requested: Option<&str>, default: OrderDirection) -> OrderDirection {
    requested.and_then(OrderDirection::parse).unwrap_or(default)
}

/// Stable sort with the comparator, then reverse when asked
pub fn sort_items<T>(items: &mut [T], compare: Comparator<T>, direction: OrderDirection) {
    items.sort_by(compare);
    if direction == OrderDirection::Reversed {
        items.reverse();
    }
}

/// `[start, start + page_size)` clamped to `[0, total)`
pub fn page_window(total: usize, start: usize, page_size: usize) -> Range<usize> {
    let begin = start.min(total);
    let end = begin.saturating_add(page_size).min(total);
    begin..end
}

/// Ordering and paging shared by every list view
#[derive(Debug, Clone, Copy)]
pub struct ListPipeline {
    page_size: usize,
}

impl ListPipeline {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Sort `items`, keep the requested window and hand it to `project`.
    ///
    /// `project` receives the page slice so cross-references can be resolved
    /// once per page before rows are built.
    pub async fn run<T, F, Fut>(
        &self,
        mut items: Vec<T>,
        fields: &[OrderField<T>],
        defaults: (&str, OrderDirection),
        params: &ListParams,
        project: F,
    ) -> crate::error::ConsoleResult<ListPage>
    where
        F: FnOnce(Vec<T>) -> Fut,
        Fut: std::future::Future<Output = crate::error::ConsoleResult<Vec<ResourceRow>>>,
    {
        let total = items.len();
        let (default_field, default_direction) = defaults;

        if let Some(field) = resolve_order_field(fields, params.order_field.as_deref(), default_field) {
            let direction = resolve_direction(params.direction.as_deref(), default_direction);
            sort_items(&mut items, field.compare, direction);
        }

        let window = page_window(total, params.start, self.page_size);
        if window.is_empty() {
            return Ok(ListPage { total, rows: Vec::new() });
        }

        let page: Vec<T> = items.drain(window).collect();
        let rows = project(page).await?;

        Ok(ListPage { total, rows })
    }
}
