//! # Pagination
//!
//! Page results and the metadata derived from them.

use crate::descriptor::{DescribeType, FieldDescriptor, TypeDescriptor, TypeKind};
use crate::envelope::groups;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Items per page. `Unlimited` is written as `-1` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerPage {
    /// At most this many items per page.
    Limited(u64),
    /// Everything on a single page.
    Unlimited,
}

impl Serialize for PerPage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PerPage::Limited(n) => serializer.serialize_u64(*n),
            PerPage::Unlimited => serializer.serialize_i64(-1),
        }
    }
}

impl<'de> Deserialize<'de> for PerPage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Ok(u64::try_from(raw).map_or(PerPage::Unlimited, PerPage::Limited))
    }
}

/// A page of results as produced by a paginator.
pub trait PageResult {
    /// Item type.
    type Item;

    /// Items on this page.
    fn items(&self) -> &[Self::Item];

    /// One-based page number.
    fn current_page(&self) -> u64;

    /// Page size.
    fn items_per_page(&self) -> PerPage;

    /// Total items across all pages.
    fn total_item_count(&self) -> u64;
}

/// An owned page of items.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items: Vec<T>,
    current_page: u64,
    per_page: PerPage,
    total: u64,
}

impl<T> Page<T> {
    /// Wraps an already sliced page.
    pub fn new(items: Vec<T>, current_page: u64, per_page: PerPage, total: u64) -> Self {
        Self {
            items,
            current_page,
            per_page,
            total,
        }
    }

    /// Slices page `page` (one-based) out of the full collection.
    pub fn from_all(all: Vec<T>, page: u64, per_page: PerPage) -> Self {
        let total = all.len() as u64;
        let page = page.max(1);
        let items = match per_page {
            PerPage::Unlimited => all,
            PerPage::Limited(n) => {
                let skip = usize::try_from((page - 1).saturating_mul(n)).unwrap_or(usize::MAX);
                let take = usize::try_from(n).unwrap_or(usize::MAX);
                all.into_iter().skip(skip).take(take).collect()
            }
        };
        Self::new(items, page, per_page, total)
    }

    /// Consumes the page, returning its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> PageResult for Page<T> {
    type Item = T;

    fn items(&self) -> &[T] {
        &self.items
    }

    fn current_page(&self) -> u64 {
        self.current_page
    }

    fn items_per_page(&self) -> PerPage {
        self.per_page
    }

    fn total_item_count(&self) -> u64 {
        self.total
    }
}

/// Metadata placed in `meta` of paginated responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// One-based page number.
    pub current_page: u64,
    /// Page size.
    pub per_page: PerPage,
    /// One-based index of the first item on the page, 0 for an empty page.
    pub from: u64,
    /// One-based index of the last item on the page, 0 for an empty page.
    pub to: u64,
    /// Total items across all pages.
    pub total: u64,
    /// Whether a following page exists.
    pub has_more: bool,
}

impl PaginationMeta {
    /// Name used when documenting this type.
    pub const TYPE_NAME: &'static str = "PaginationMeta";

    /// Derives the metadata for a page holding `item_count` items. Indexes
    /// past `u64::MAX` saturate.
    pub fn compute(item_count: u64, page: u64, per_page: PerPage, total: u64) -> Self {
        let (from, to) = if item_count == 0 {
            (0, 0)
        } else {
            let from = match per_page {
                PerPage::Limited(n) => page.saturating_sub(1).saturating_mul(n).saturating_add(1),
                PerPage::Unlimited => 1,
            };
            (from, from.saturating_add(item_count - 1))
        };
        let has_more = match per_page {
            PerPage::Limited(n) => total > n.saturating_mul(page),
            PerPage::Unlimited => false,
        };

        Self {
            current_page: page,
            per_page,
            from,
            to,
            total,
            has_more,
        }
    }

    /// Derives the metadata for a page result.
    pub fn from_page<P: PageResult + ?Sized>(page: &P) -> Self {
        Self::compute(
            page.items().len() as u64,
            page.current_page(),
            page.items_per_page(),
            page.total_item_count(),
        )
    }
}

impl DescribeType for PaginationMeta {
    fn describe() -> TypeDescriptor {
        let int = |name: &str| {
            FieldDescriptor::new(name, TypeKind::builtin("u64")).in_groups([groups::API_SUCCESS])
        };
        TypeDescriptor::new(Self::TYPE_NAME)
            .with_description("Pagination details of a list response")
            .field(int("currentPage"))
            .field(
                FieldDescriptor::new("perPage", TypeKind::builtin("i64"))
                    .in_groups([groups::API_SUCCESS])
                    .with_description("Page size, -1 when unlimited"),
            )
            .field(int("from"))
            .field(int("to"))
            .field(int("total"))
            .field(
                FieldDescriptor::new("hasMore", TypeKind::builtin("bool"))
                    .in_groups([groups::API_SUCCESS]),
            )
    }
}
