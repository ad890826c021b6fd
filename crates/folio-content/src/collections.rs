//! Grouping and paging of post listings.

use std::collections::BTreeMap;

use serde::Serialize;

use folio_mdx::slugify;

use crate::post::Post;

/// Largest page size accepted by [`paginate`].
pub const MAX_PAGE_SIZE: usize = 100;

/// Distinct categories across `posts`, sorted by slug.
///
/// Names with the same slug are one category, listed under the spelling of
/// the first post that uses it. Names with an empty slug are left out.
pub fn categories(posts: &[Post]) -> Vec<String> {
    let mut by_slug = BTreeMap::new();

    for name in posts.iter().filter_map(|post| post.category.as_deref()) {
        let slug = slugify(name);
        if !slug.is_empty() {
            by_slug.entry(slug).or_insert(name);
        }
    }

    by_slug.into_values().map(str::to_string).collect()
}

/// Posts whose category has the same slug as `category`.
///
/// `"Web Dev"`, `"web dev"` and `"web-dev"` all name the same category.
pub fn posts_in_category<'a>(posts: &'a [Post], category: &str) -> Vec<&'a Post> {
    let wanted = slugify(category);

    posts
        .iter()
        .filter(|post| post.category.as_deref().is_some_and(|c| slugify(c) == wanted))
        .collect()
}

/// Paging information returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_posts: usize,
    pub has_more: bool,
}

/// One page of items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub posts: Vec<T>,
    pub pagination: Pagination,
}

/// Slice `items` into 1-based page `page` of `limit` items.
///
/// `page` below 1 is treated as 1 and `limit` is clamped to
/// `1..=MAX_PAGE_SIZE`. Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, limit: usize) -> Page<T> {
    let page = page.max(1);
    let limit = limit.clamp(1, MAX_PAGE_SIZE);
    let total = items.len();
    let total_pages = total.div_ceil(limit);

    let start = (page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);

    Page {
        posts: items[start..end].to_vec(),
        pagination: Pagination {
            current_page: page,
            total_pages,
            total_posts: total,
            has_more: page < total_pages,
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn post(slug: &str, category: Option<&str>) -> Post {
        Post {
            slug: slug.to_string(),
            title: None,
            date: None,
            category: category.map(str::to_string),
            excerpt: None,
            content: String::new(),
            reading_time: "0 min read".to_string(),
        }
    }

    #[test]
    fn collects_distinct_categories() {
        let posts = vec![
            post("a", Some("Rust")),
            post("b", Some("Design")),
            post("c", Some("Rust")),
            post("d", None),
        ];

        assert_eq!(categories(&posts), vec!["Design", "Rust"]);
    }

    #[test]
    fn categories_with_the_same_slug_are_merged() {
        let posts = vec![
            post("a", Some("Web Dev")),
            post("b", Some("web dev")),
            post("c", Some("web-dev")),
            post("d", Some("!!!")),
        ];

        assert_eq!(categories(&posts), vec!["Web Dev"]);
    }

    #[test]
    fn filters_by_category() {
        let posts = vec![
            post("a", Some("Rust")),
            post("b", Some("Design")),
            post("c", Some("Web Dev")),
        ];

        let slugs = |category: &str| -> Vec<String> {
            posts_in_category(&posts, category)
                .into_iter()
                .map(|p| p.slug.clone())
                .collect()
        };

        assert_eq!(slugs("rust"), vec!["a"]);
        assert_eq!(slugs("web-dev"), vec!["c"]);
        assert!(slugs("cooking").is_empty());
    }

    #[test]
    fn paginates_items() {
        let items: Vec<u32> = (1..=25).collect();

        let page = paginate(&items, 3, 10);

        assert_eq!(page.posts, vec![21, 22, 23, 24, 25]);
        assert_eq!(
            page.pagination,
            Pagination {
                current_page: 3,
                total_pages: 3,
                total_posts: 25,
                has_more: false,
            }
        );
        assert!(paginate(&items, 1, 10).pagination.has_more);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<u32> = (1..=5).collect();

        let page = paginate(&items, 9, 10);

        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn clamps_page_and_limit() {
        let items: Vec<u32> = (1..=5).collect();

        let page = paginate(&items, 0, 0);

        assert_eq!(page.posts, vec![1]);
        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.pagination.total_pages, 5);
    }

    #[test]
    fn empty_listing() {
        let page = paginate::<u32>(&[], 1, 10);

        assert!(page.posts.is_empty());
        assert_eq!(page.pagination.total_pages, 0);
        assert!(!page.pagination.has_more);
    }
}
