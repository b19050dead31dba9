//! This modules defines the common functionality for paging data.

use maud::{Markup, html};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The maximum transactions to display per page.
    pub default_page_size: u64,
    /// The maximum number of pages to show in the pagination indicator.
    pub max_pages: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 50,
            max_pages: 5,
        }
    }
}

/// One page of items cut from a longer list.
#[derive(Debug, PartialEq)]
pub struct Page<T> {
    /// The items on the page.
    pub items: Vec<T>,
    /// The 1-based number of the page.
    pub page: u64,
    /// How many pages the whole list spans, zero for an empty list.
    pub page_count: u64,
}

/// Cut page number `page` of size `page_size` from `items`.
///
/// Page numbers start at 1, a page of zero is treated as the first page.
/// Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: u64, page_size: u64) -> Page<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let page_count = (items.len() as u64).div_ceil(page_size);
    let offset = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);

    let items = items
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();

    Page {
        items,
        page,
        page_count,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum PaginationIndicator {
    Page(u64),
    CurrPage(u64),
    Ellipsis,
    NextButton(u64),
    BackButton(u64),
}

pub fn create_pagination_indicators(
    curr_page: u64,
    page_count: u64,
    max_pages: u64,
) -> Vec<PaginationIndicator> {
    let map_page = |page| {
        if page == curr_page {
            PaginationIndicator::CurrPage(page)
        } else {
            PaginationIndicator::Page(page)
        }
    };

    let mut indicators: Vec<PaginationIndicator> = if page_count <= max_pages {
        (1..=page_count).map(map_page).collect()
    } else if curr_page <= (max_pages / 2) {
        (1..=max_pages).map(map_page).collect()
    } else if curr_page > (page_count - max_pages / 2) {
        ((page_count - max_pages + 1)..=page_count)
            .map(map_page)
            .collect()
    } else {
        ((curr_page - max_pages / 2)..=(curr_page + max_pages / 2))
            .map(map_page)
            .collect()
    };

    if page_count > max_pages {
        if curr_page > (max_pages / 2) + 1 {
            indicators.insert(0, PaginationIndicator::Page(1));
            indicators.insert(1, PaginationIndicator::Ellipsis);
        }

        if curr_page < (page_count - max_pages / 2) {
            indicators.push(PaginationIndicator::Ellipsis);
            indicators.push(PaginationIndicator::Page(page_count));
        }
    }

    if curr_page > 1 {
        indicators.insert(0, PaginationIndicator::BackButton(curr_page - 1));
    }

    if curr_page < page_count {
        indicators.push(PaginationIndicator::NextButton(curr_page + 1));
    }

    indicators
}

/// Render the pagination indicators as links, `page_url` gives the link for a page number.
pub fn pagination_view(
    indicators: &[PaginationIndicator],
    page_url: impl Fn(u64) -> String,
) -> Markup {
    let page_style = "px-3 py-2 leading-tight text-gray-500 bg-white border \
        border-gray-300 hover:bg-gray-100 hover:text-gray-700 dark:bg-gray-800 \
        dark:border-gray-700 dark:text-gray-400 dark:hover:bg-gray-700 dark:hover:text-white";
    let current_page_style = "px-3 py-2 leading-tight text-blue-600 border \
        border-gray-300 bg-blue-50 dark:border-gray-700 dark:bg-gray-700 dark:text-white";

    html!(
        nav aria-label="Pagination" class="flex justify-center my-4"
        {
            ul class="inline-flex -space-x-px text-sm"
            {
                @for indicator in indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::Page(page) => {
                                a href=(page_url(*page)) class=(page_style) { (page) }
                            }
                            PaginationIndicator::CurrPage(page) => {
                                span aria-current="page" class=(current_page_style) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(page_style) { "..." }
                            }
                            PaginationIndicator::BackButton(page) => {
                                a href=(page_url(*page)) class=(page_style) { "Back" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a href=(page_url(*page)) class=(page_style) { "Next" }
                            }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod paginate_tests {
    use crate::pagination::{Page, paginate};

    #[test]
    fn cuts_requested_page() {
        let got = paginate((1..=7).collect(), 2, 3);

        assert_eq!(
            got,
            Page {
                items: vec![4, 5, 6],
                page: 2,
                page_count: 3
            }
        );
    }

    #[test]
    fn last_page_may_be_short() {
        let got = paginate((1..=7).collect(), 3, 3);

        assert_eq!(got.items, vec![7]);
    }

    #[test]
    fn page_zero_is_first_page() {
        let got = paginate(vec!['a', 'b'], 0, 50);

        assert_eq!(got.page, 1);
        assert_eq!(got.items, vec!['a', 'b']);
        assert_eq!(got.page_count, 1);
    }

    #[test]
    fn page_past_end_is_empty() {
        let got = paginate(vec![1, 2, 3], 9, 2);

        assert!(got.items.is_empty());
        assert_eq!(got.page_count, 2);
    }

    #[test]
    fn empty_list_has_no_pages() {
        let got = paginate(Vec::<u8>::new(), 1, 50);

        assert_eq!(got.page_count, 0);
    }
}


#[cfg(test)]
mod tests {
    use crate::pagination::{PaginationIndicator, create_pagination_indicators};

    #[test]
    fn shows_all_pages() {
        let max_pages = 5;
        let page_count = 5;
        let curr_page = 1;
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_left() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 1;
        let want = [
            PaginationIndicator::CurrPage(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(2),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_both_buttons_and_trailing_ellipsis() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 3;
        let want = [
            PaginationIndicator::BackButton(2),
            PaginationIndicator::Page(1),
            PaginationIndicator::Page(2),
            PaginationIndicator::CurrPage(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::Page(5),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(4),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_page_subset_on_right() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 10;
        let want = [
            PaginationIndicator::BackButton(9),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Page(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::CurrPage(10),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn shows_both_buttons_and_leading_ellipsis() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 8;
        let want = [
            PaginationIndicator::BackButton(7),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::CurrPage(8),
            PaginationIndicator::Page(9),
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(9),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }

    #[test]
    fn pagination_indicator_shows_page_subset_in_center() {
        let max_pages = 5;
        let page_count = 10;
        let curr_page = 5;
        let want = [
            PaginationIndicator::BackButton(4),
            PaginationIndicator::Page(1),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(3),
            PaginationIndicator::Page(4),
            PaginationIndicator::CurrPage(5),
            PaginationIndicator::Page(6),
            PaginationIndicator::Page(7),
            PaginationIndicator::Ellipsis,
            PaginationIndicator::Page(10),
            PaginationIndicator::NextButton(6),
        ];

        let got = create_pagination_indicators(curr_page, page_count, max_pages);

        assert_eq!(want, got.as_slice());
    }
}
