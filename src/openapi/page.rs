//! Page-number pagination over list actions.
//!
//! The provider returns bounded pages alongside a `TotalCount` field. The
//! loop accumulates items until the accumulated count reaches that total,
//! or until a page comes back empty (totals are occasionally stale).

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use super::OpenApiError;

pub const PAGE_SIZE: i64 = 50;

/// Courtesy delay between page requests so a large inventory walk stays
/// under the provider's rate limits.
pub const PAGE_DELAY: Duration = Duration::from_millis(200);

pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: i64,
}

pub async fn collect_pages<T, F, Fut>(delay: Duration, mut fetch: F) -> Result<Vec<T>, OpenApiError>
where
    F: FnMut(i64) -> Fut,
    Fut: Future<Output = Result<Page<T>, OpenApiError>>,
{
    let mut items = Vec::new();
    let mut page_number = 1;

    loop {
        let page = fetch(page_number).await?;
        let fetched = page.items.len();
        items.extend(page.items);

        if fetched == 0 || items.len() as i64 >= page.total_count {
            break;
        }

        page_number += 1;
        sleep(delay).await;
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;

    fn fake_error() -> OpenApiError {
        OpenApiError::Api {
            action: "DescribeInstances".into(),
            code: "Throttling".into(),
            message: "Request was denied due to request throttling.".into(),
            request_id: "ABCD-1234".into(),
        }
    }

    #[tokio::test]
    async fn terminates_after_ceil_of_total_over_page_size_fetches() {
        let calls = Arc::new(AtomicI64::new(0));
        let counter = calls.clone();

        // 5 items served in pages of 2: pages 1 and 2 are full, page 3 short.
        let items = collect_pages(Duration::ZERO, move |page_number| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                let start = (page_number - 1) * 2;
                let end = (start + 2).min(5);
                Ok(Page {
                    items: (start..end).collect::<Vec<i64>>(),
                    total_count: 5,
                })
            }
        })
        .await
        .expect("pagination must succeed");

        assert_eq!(items, vec![0, 1, 2, 3, 4]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn single_full_page_needs_no_second_fetch() {
        let calls = Arc::new(AtomicI64::new(0));
        let counter = calls.clone();

        let items = collect_pages(Duration::ZERO, move |_page_number| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Page {
                    items: vec!["i-a", "i-b"],
                    total_count: 2,
                })
            }
        })
        .await
        .expect("pagination must succeed");

        assert_eq!(items.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_page_ends_the_walk_even_below_the_reported_total() {
        let items = collect_pages(Duration::ZERO, |page_number| async move {
            // The provider claims ten items but only ever serves two.
            if page_number == 1 {
                Ok(Page {
                    items: vec![1, 2],
                    total_count: 10,
                })
            } else {
                Ok(Page {
                    items: Vec::new(),
                    total_count: 10,
                })
            }
        })
        .await
        .expect("pagination must succeed");

        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn empty_result_set_is_not_an_error() {
        let items: Vec<i64> = collect_pages(Duration::ZERO, |_page_number| async move {
            Ok(Page {
                items: Vec::new(),
                total_count: 0,
            })
        })
        .await
        .expect("pagination must succeed");

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn fetch_errors_surface_immediately() {
        let result: Result<Vec<i64>, _> =
            collect_pages(Duration::ZERO, |page_number| async move {
                if page_number == 1 {
                    Ok(Page {
                        items: vec![1, 2],
                        total_count: 4,
                    })
                } else {
                    Err(fake_error())
                }
            })
            .await;

        assert!(matches!(result, Err(OpenApiError::Api { .. })));
    }
}
