// ── Entity-agnostic filter / sort / paginate ──
//
// One implementation for every list screen. All functions are pure and
// operate on the snapshot currently held by the store.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A record that can be shown in a filtered, sorted, paginated list.
pub trait Listable {
    /// Numeric record id.
    fn id(&self) -> i64;

    /// The one designated display field lists filter and sort on
    /// (username, samId, location name, email address, log activity).
    fn display_key(&self) -> &str;
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// The display field, compared as text.
    #[default]
    Name,
    /// The numeric id, compared as a number.
    Id,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// UI-held list parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring applied to the display field. Empty means no filter.
    pub filter: String,
    /// `None` keeps the order the backend returned.
    pub sort: Option<SortKey>,
    pub direction: SortDirection,
    /// 1-based page number.
    pub page: usize,
    /// Rows per page; `0` disables pagination.
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: String::new(),
            sort: None,
            direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One derived page of a list.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub items: Vec<Arc<T>>,
    /// Records matching the filter, across all pages.
    pub matched: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl ListQuery {
    /// Filter, then sort, then cut out the requested page.
    pub fn apply<T: Listable>(&self, records: &[Arc<T>]) -> ListPage<T> {
        let mut rows = filter_records(records, &self.filter);
        if let Some(key) = self.sort {
            sort_records(&mut rows, key, self.direction);
        }
        let matched = rows.len();
        let items = paginate(&rows, self.page, self.page_size).to_vec();
        ListPage {
            items,
            matched,
            page: self.page.max(1),
            total_pages: total_pages(matched, self.page_size),
        }
    }

    /// Move to the next page if there is one.
    pub fn next_page(&mut self, matched: usize) {
        if self.page < total_pages(matched, self.page_size) {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    /// Replace the filter text and return to the first page.
    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page = 1;
    }
}

/// Keep records whose display field contains `needle`, ignoring case.
/// An empty needle keeps everything.
pub fn filter_records<T: Listable>(records: &[Arc<T>], needle: &str) -> Vec<Arc<T>> {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| r.display_key().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Stable sort in place. Ties keep their incoming order in both directions.
pub fn sort_records<T: Listable>(records: &mut [Arc<T>], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare(a.as_ref(), b.as_ref(), key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare<T: Listable>(a: &T, b: &T, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a
            .display_key()
            .to_lowercase()
            .cmp(&b.display_key().to_lowercase()),
        SortKey::Id => a.id().cmp(&b.id()),
    }
}

/// The slice `[(page-1)*page_size, page*page_size)`, clamped to the input.
/// Pages past the end yield an empty slice. Page `0` is treated as page 1.
pub fn paginate<T>(records: &[T], page: usize, page_size: usize) -> &[T] {
    if page_size == 0 {
        return records;
    }
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= records.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(records.len());
    &records[start..end]
}

/// `ceil(total / page_size)`; a single page when pagination is off.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return usize::from(total > 0);
    }
    total.div_ceil(page_size)
}
