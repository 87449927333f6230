use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub skip: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a filtered listing plus the size of the whole listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            total: self.total,
            skip: self.skip,
            limit: self.limit,
            items: self.items.into_iter().map(f).collect(),
        }
    }

    /// True when items exist past this page
    pub fn has_more(&self) -> bool {
        self.skip.saturating_add(self.items.len()) < self.total
    }
}

/// Take the contiguous slice `[skip, skip + limit)` of `items`
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total = items.len();
    let page_items = items
        .into_iter()
        .skip(request.skip)
        .take(request.limit)
        .collect();

    Page {
        total,
        skip: request.skip,
        limit: request.limit,
        items: page_items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let page = paginate((0..50).collect(), PageRequest::default());
        assert_eq!(page.total, 50);
        assert_eq!(page.items, (0..20).collect::<Vec<_>>());
        assert!(page.has_more());
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate((0..25).collect(), PageRequest { skip: 20, limit: 20 });
        assert_eq!(page.total, 25);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert!(!page.has_more());
    }

    #[test]
    fn test_skip_past_end_is_empty() {
        let page: Page<i32> = paginate((0..5).collect(), PageRequest { skip: 10, limit: 20 });
        assert_eq!(page.total, 5);
        assert!(page.items.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn test_pages_reconstruct_sequence_exactly_once() {
        let data: Vec<u32> = (0..97).collect();
        for limit in [1, 7, 20, 96, 97, 100] {
            let mut rebuilt = Vec::new();
            let mut skip = 0;
            loop {
                let page = paginate(data.clone(), PageRequest { skip, limit });
                assert_eq!(page.total, data.len());
                if page.items.is_empty() {
                    break;
                }
                skip += page.items.len();
                rebuilt.extend(page.items);
            }
            assert_eq!(rebuilt, data, "limit {}", limit);
        }
    }

    #[test]
    fn test_map_keeps_metadata() {
        let page = paginate(vec![1, 2, 3], PageRequest { skip: 1, limit: 1 });
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![20]);
        assert_eq!(mapped.total, 3);
        assert_eq!(mapped.skip, 1);
        assert_eq!(mapped.limit, 1);
    }
}
