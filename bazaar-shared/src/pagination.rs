/// Page-number pagination
///
/// Collection endpoints return an envelope:
///
/// ```json
/// {"count": 42, "next": "http://host/api/accounts/?page=3", "previous": "http://host/api/accounts/", "results": [...]}
/// ```
///
/// The page is selected with `?page=N` (1-based) or `?page=last`. A missing or
/// empty parameter selects the first page. The first page always exists, even
/// for an empty collection; any other page outside the collection is an error.
///
/// # Example
///
/// ```
/// use bazaar_shared::pagination::{Page, PageWindow};
///
/// let window = PageWindow::resolve(Some("2"), 25, 10).unwrap();
/// assert_eq!((window.offset, window.limit), (10, 10));
///
/// let page = Page::new(vec!["k"; 10], &window, "http://localhost/api/products/");
/// assert_eq!(page.next.as_deref(), Some("http://localhost/api/products/?page=3"));
/// assert_eq!(page.previous.as_deref(), Some("http://localhost/api/products/"));
/// ```

use serde::Serialize;

/// Query parameter carrying the page number
pub const PAGE_QUERY_PARAM: &str = "page";

/// Keyword selecting the last page
const LAST_PAGE: &str = "last";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// Not a number, below 1, or past the last page
    #[error("Invalid page.")]
    InvalidPage,
}

/// Rows selected by a page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number
    pub number: i64,

    /// Total pages, at least 1
    pub num_pages: i64,

    /// Total rows across all pages
    pub total: i64,

    pub offset: i64,

    /// Rows on this page; short on the last page
    pub limit: i64,
}

impl PageWindow {
    /// Resolves the raw `page` parameter against a collection of `total` rows
    ///
    /// # Errors
    ///
    /// `PaginationError::InvalidPage` if the parameter is not a positive
    /// integer (or `last`), or points past the last page
    pub fn resolve(page: Option<&str>, total: i64, page_size: i64) -> Result<Self, PaginationError> {
        let page_size = page_size.max(1);
        let total = total.max(0);
        let num_pages = ((total + page_size - 1) / page_size).max(1);

        let number = match page.map(str::trim) {
            None | Some("") => 1,
            Some(LAST_PAGE) => num_pages,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| PaginationError::InvalidPage)?,
        };

        if number < 1 || number > num_pages {
            return Err(PaginationError::InvalidPage);
        }

        let offset = (number - 1) * page_size;
        let limit = page_size.min(total - offset).max(0);

        Ok(Self {
            number,
            num_pages,
            total,
            offset,
            limit,
        })
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Pagination envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wraps one page of results
    ///
    /// `base_url` is the absolute URL of the collection without a query string.
    /// The link to page 1 is `base_url` itself.
    pub fn new(results: Vec<T>, window: &PageWindow, base_url: &str) -> Self {
        let next = window
            .has_next()
            .then(|| page_link(base_url, window.number + 1));

        let previous = window
            .has_previous()
            .then(|| page_link(base_url, window.number - 1));

        Self {
            count: window.total,
            next,
            previous,
            results,
        }
    }

    /// Converts every result, keeping count and links
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn page_link(base_url: &str, number: i64) -> String {
    if number <= 1 {
        base_url.to_string()
    } else {
        format!("{}?{}={}", base_url, PAGE_QUERY_PARAM, number)
    }
}
