use serde::Serialize;

/// Blog list page size.
pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
    total_items: usize,
}

impl Paginator {
    pub fn new(total_items: usize, per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
            total_items,
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// An empty list still has one (empty) page.
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.per_page).max(1)
    }

    /// Maps a raw `page` parameter onto a valid 1-based page number.
    ///
    /// Missing or non-numeric input selects the first page. Numbers outside
    /// `1..=total_pages` clamp to the nearest end instead of failing.
    pub fn resolve(&self, requested: Option<&str>) -> usize {
        let last = self.total_pages();
        let Some(raw) = requested.map(str::trim).filter(|s| !s.is_empty()) else {
            return 1;
        };

        match raw.parse::<i64>() {
            Ok(n) if n < 1 => 1,
            Ok(n) => usize::try_from(n).map_or(last, |n| n.min(last)),
            // Digits that overflow i64 are still "past the end" (or before the start).
            Err(_) if is_integer_literal(raw) => {
                if raw.starts_with('-') {
                    1
                } else {
                    last
                }
            }
            Err(_) => 1,
        }
    }

    pub fn offset(&self, number: usize) -> usize {
        (number.max(1) - 1) * self.per_page
    }
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// One page of results plus the navigation metadata templates need.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<usize>,
    pub previous_page_number: Option<usize>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, number: usize, paginator: &Paginator) -> Self {
        let total_pages = paginator.total_pages();
        let has_next = number < total_pages;
        let has_previous = number > 1;

        Self {
            items,
            number,
            per_page: paginator.per_page(),
            total_items: paginator.total_items(),
            total_pages,
            has_next,
            has_previous,
            next_page_number: has_next.then_some(number + 1),
            previous_page_number: has_previous.then(|| number - 1),
        }
    }

    /// Transforms the items while keeping the navigation metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_next: self.has_next,
            has_previous: self.has_previous,
            next_page_number: self.next_page_number,
            previous_page_number: self.previous_page_number,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(Paginator::new(0, 10).total_pages(), 1);
        assert_eq!(Paginator::new(10, 10).total_pages(), 1);
        assert_eq!(Paginator::new(11, 10).total_pages(), 2);
        assert_eq!(Paginator::new(25, 10).total_pages(), 3);
    }

    #[test]
    fn test_resolve_defaults_to_first_page() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.resolve(None), 1);
        assert_eq!(p.resolve(Some("")), 1);
        assert_eq!(p.resolve(Some("abc")), 1);
        assert_eq!(p.resolve(Some("1.5")), 1);
    }

    #[test]
    fn test_resolve_clamps_out_of_range() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.resolve(Some("0")), 1);
        assert_eq!(p.resolve(Some("-3")), 1);
        assert_eq!(p.resolve(Some("4")), 3);
        assert_eq!(p.resolve(Some("99999999999999999999999")), 3);
        assert_eq!(p.resolve(Some(" 2 ")), 2);
    }

    #[test]
    fn test_offset() {
        let p = Paginator::new(25, 10);
        assert_eq!(p.offset(1), 0);
        assert_eq!(p.offset(3), 20);
    }

    #[test]
    fn test_page_navigation_metadata() {
        let p = Paginator::new(25, 10);

        let first = Page::new(vec![0; 10], 1, &p);
        assert!(first.has_next);
        assert!(!first.has_previous);
        assert_eq!(first.next_page_number, Some(2));
        assert_eq!(first.previous_page_number, None);

        let last = Page::new(vec![0; 5], 3, &p);
        assert!(!last.has_next);
        assert!(last.has_previous);
        assert_eq!(last.previous_page_number, Some(2));
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.total_items, 25);
    }
}
