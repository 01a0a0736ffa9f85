//! Page-number pagination shared by catalog listings and admin lists

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Records per page on catalog list pages
pub const CATALOG_PAGE_SIZE: i64 = 5;
/// Rows per page on admin change lists
pub const ADMIN_PAGE_SIZE: i64 = 100;

/// Requested page: a 1-based number or the last page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumber {
    Number(i64),
    Last,
}

impl Default for PageNumber {
    fn default() -> Self {
        PageNumber::Number(1)
    }
}

impl PageNumber {
    /// Parse the raw `page` query value. Absent or empty means the first page.
    pub fn parse(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(PageNumber::Number(1)),
            Some("last") => Ok(PageNumber::Last),
            Some(s) => s
                .parse::<i64>()
                .map(PageNumber::Number)
                .map_err(|_| AppError::InvalidPage("That page number is not an integer".to_string())),
        }
    }
}

/// Resolved position of one page inside a collection of `count` records.
///
/// An empty collection still has a valid first page. Any other page outside
/// `1..=num_pages` is rejected rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub per_page: i64,
}

impl PageWindow {
    pub fn resolve(count: i64, per_page: i64, page: PageNumber) -> AppResult<Self> {
        let per_page = per_page.max(1);
        let count = count.max(0);
        let num_pages = ((count + per_page - 1) / per_page).max(1);

        let number = match page {
            PageNumber::Last => num_pages,
            PageNumber::Number(n) => n,
        };
        if number < 1 {
            return Err(AppError::InvalidPage("That page number is less than 1".to_string()));
        }
        if number > num_pages {
            return Err(AppError::InvalidPage("That page contains no results".to_string()));
        }

        Ok(Self {
            number,
            num_pages,
            count,
            per_page,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// One page of records plus pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Records on this page
    pub items: Vec<T>,
    /// Current page number (1-based)
    pub number: i64,
    /// Total number of pages
    pub num_pages: i64,
    /// Total number of records
    pub count: i64,
    /// Records per page
    pub per_page: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn from_window(window: PageWindow, items: Vec<T>) -> Self {
        Self {
            items,
            number: window.number,
            num_pages: window.num_pages,
            count: window.count,
            per_page: window.per_page,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
        }
    }
}

/// Split an already-ordered collection into pages and return the requested one.
pub fn paginate<T>(collection: Vec<T>, per_page: i64, page: PageNumber) -> AppResult<Page<T>>
where
    T: for<'a> ToSchema<'a>,
{
    let window = PageWindow::resolve(collection.len() as i64, per_page, page)?;
    let items = collection
        .into_iter()
        .skip(window.offset() as usize)
        .take(window.limit() as usize)
        .collect();
    Ok(Page::from_window(window, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, ToSchema, PartialEq)]
    struct Row {
        n: i64,
    }

    fn rows(count: i64) -> Vec<Row> {
        (1..=count).map(|n| Row { n }).collect()
    }

    #[test]
    fn test_twelve_records_in_pages_of_five() {
        let first = paginate(rows(12), CATALOG_PAGE_SIZE, PageNumber::Number(1)).unwrap();
        assert_eq!(first.items.len(), 5);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.num_pages, 3);

        let third = paginate(rows(12), CATALOG_PAGE_SIZE, PageNumber::Number(3)).unwrap();
        assert_eq!(third.items, vec![Row { n: 11 }, Row { n: 12 }]);
        assert!(!third.has_next);
        assert!(third.has_previous);
    }

    #[test]
    fn test_out_of_range_pages_error() {
        assert!(matches!(
            paginate(rows(12), 5, PageNumber::Number(4)),
            Err(AppError::InvalidPage(_))
        ));
        assert!(matches!(
            paginate(rows(12), 5, PageNumber::Number(0)),
            Err(AppError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_empty_collection_has_first_page() {
        let page = paginate(rows(0), 5, PageNumber::Number(1)).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.num_pages, 1);
        assert!(!page.has_next);
        assert!(matches!(
            paginate(rows(0), 5, PageNumber::Number(2)),
            Err(AppError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_last_page() {
        let window = PageWindow::resolve(10, 5, PageNumber::Last).unwrap();
        assert_eq!(window.number, 2);
        assert_eq!(window.offset(), 5);
    }

    #[test]
    fn test_parse_page_number() {
        assert_eq!(PageNumber::parse(None).unwrap(), PageNumber::Number(1));
        assert_eq!(PageNumber::parse(Some("")).unwrap(), PageNumber::Number(1));
        assert_eq!(PageNumber::parse(Some("3")).unwrap(), PageNumber::Number(3));
        assert_eq!(PageNumber::parse(Some("last")).unwrap(), PageNumber::Last);
        assert!(matches!(
            PageNumber::parse(Some("abc")),
            Err(AppError::InvalidPage(_))
        ));
    }
}
