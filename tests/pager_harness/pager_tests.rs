//! Macro-generated test suite for keyset pagination over a `TestStore`.
//!
//! The `pager_contract_tests!` macro generates a test module that validates a
//! `DocumentStore<TestMember>` backend end to end through the paginator:
//! ordering, boundary flags, search windows and recovery after removals.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod pager_harness;
//!
//! use pager_harness::*;
//! use keyset::storage::InMemoryStore;
//!
//! pager_contract_tests!(InMemoryStore::<TestMember>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Navigation
//! - `test_forward_walkthrough`: three forward pages of the seven-name list
//! - `test_last_page_and_backward_walk`: backward from the end mirrors forward
//! - `test_back_from_next_page_reproduces_page`: after/before symmetry
//! - `test_ties_break_by_id_in_both_directions`: equal keys page by id
//! - `test_full_walk_has_no_gaps_or_duplicates`: 23 rows in pages of 5
//!
//! ## Filters and search
//! - `test_scope_and_total`: base filter scopes rows and the total
//! - `test_search_disjunction_survives_window`: `OR` search stays intact past page one
//! - `test_folded_prefix_search`: case and accent-insensitive prefix
//! - `test_email_pivot_pages_by_email`: pivoted lists sort and page on email
//!
//! ## Edge cases
//! - `test_malformed_cursor_serves_first_page`
//! - `test_empty_collection`
//!
//! ## Recovery
//! - `test_removing_rest_of_list_recovers_previous_page`
//! - `test_explicit_recovery_probes_next`
//! - `test_removing_everything_resets_to_first`

/// Generate the pagination conformance suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty store
/// implementing `TestStore`. It is re-evaluated for each test to ensure
/// isolation.
macro_rules! pager_contract_tests {
    ($factory:expr) => {
        mod pager_contract_tests {
            use super::*;
            use keyset::core::filter::Filter;
            use keyset::core::search::{SearchPlan, email_pivot_ok};
            use keyset::core::window::KeysetConfig;
            use keyset::core::page::PageRequest;
            use keyset::paging::RecoveryStrategy;
            use uuid::Uuid;

            // ==================================================================
            // Navigation
            // ==================================================================

            #[tokio::test]
            async fn test_forward_walkthrough() {
                let pager = paginator_over($factory, &members(&scenario_names())).await;

                let first = pager.fetch(&people_request(3)).await.unwrap();
                assert_page(&first, &["ann", "bob", "cara"], false, true);

                let second = pager
                    .fetch(&people_request(3).after(first.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_page(&second, &["dev", "eve", "finn"], true, true);

                let third = pager
                    .fetch(&people_request(3).after(second.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_page(&third, &["gus"], true, false);
                assert_eq!(third.total, 7);
            }

            #[tokio::test]
            async fn test_last_page_and_backward_walk() {
                let pager = paginator_over($factory, &members(&scenario_names())).await;

                let last = pager.fetch(&people_request(3).last()).await.unwrap();
                assert_page(&last, &["eve", "finn", "gus"], true, false);

                let middle = pager
                    .fetch(&people_request(3).before(last.first_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_page(&middle, &["bob", "cara", "dev"], true, true);

                let head = pager
                    .fetch(&people_request(3).before(middle.first_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_page(&head, &["ann"], false, true);
            }

            #[tokio::test]
            async fn test_back_from_next_page_reproduces_page() {
                let pager = paginator_over($factory, &members(&scenario_names())).await;

                let first = pager.fetch(&people_request(3)).await.unwrap();
                let second = pager
                    .fetch(&people_request(3).after(first.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                let back = pager
                    .fetch(&people_request(3).before(second.first_cursor.clone().unwrap()))
                    .await
                    .unwrap();

                assert_eq!(back.items, first.items);
                assert_eq!(back.first_cursor, first.first_cursor);
                assert_eq!(back.last_cursor, first.last_cursor);
                assert!(!back.has_prev);
                assert!(back.has_next);
            }

            #[tokio::test]
            async fn test_ties_break_by_id_in_both_directions() {
                let rows: Vec<TestMember> = (1..=5).map(|n| member(n, "Sam Lee")).collect();
                let pager = paginator_over($factory, &rows).await;
                let ids = |page: &keyset::core::page::PageResult<TestMember>| -> Vec<u128> {
                    page.items.iter().map(|m| m.id.as_u128()).collect()
                };

                let p1 = pager.fetch(&people_request(2)).await.unwrap();
                let p2 = pager
                    .fetch(&people_request(2).after(p1.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                let p3 = pager
                    .fetch(&people_request(2).after(p2.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_eq!(ids(&p1), vec![1, 2]);
                assert_eq!(ids(&p2), vec![3, 4]);
                assert_eq!(ids(&p3), vec![5]);
                assert!(!p3.has_next);

                let b1 = pager.fetch(&people_request(2).last()).await.unwrap();
                let b2 = pager
                    .fetch(&people_request(2).before(b1.first_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                let b3 = pager
                    .fetch(&people_request(2).before(b2.first_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_eq!(ids(&b1), vec![4, 5]);
                assert_eq!(ids(&b2), vec![2, 3]);
                assert_eq!(ids(&b3), vec![1]);
                assert!(!b3.has_prev);
            }

            #[tokio::test]
            async fn test_full_walk_has_no_gaps_or_duplicates() {
                let rows = numbered(23);
                let pager = paginator_over($factory, &rows).await;

                let mut seen = Vec::new();
                let mut request = people_request(5);
                loop {
                    let page = pager.fetch(&request).await.unwrap();
                    seen.extend(page.items.iter().cloned());
                    if !page.has_next {
                        break;
                    }
                    request = people_request(5).after(page.last_cursor.clone().unwrap());
                }
                assert_eq!(seen, rows);

                let mut seen_backward = Vec::new();
                let mut request = people_request(5).last();
                loop {
                    let page = pager.fetch(&request).await.unwrap();
                    let mut chunk = page.items.clone();
                    chunk.extend(seen_backward);
                    seen_backward = chunk;
                    if !page.has_prev {
                        break;
                    }
                    request = people_request(5).before(page.first_cursor.clone().unwrap());
                }
                assert_ordered(&seen_backward);
                assert_eq!(seen_backward, rows);
            }

            // ==================================================================
            // Filters and search
            // ==================================================================

            #[tokio::test]
            async fn test_scope_and_total() {
                let mut rows = members(&["ann", "bob", "cara"]);
                let mut outsider = member(99, "aaron");
                outsider.org = OTHER_ORG.to_string();
                rows.push(outsider);
                let pager = paginator_over($factory, &rows).await;

                let page = pager.fetch(&people_request(10)).await.unwrap();
                assert_page(&page, &["ann", "bob", "cara"], false, false);
                assert_eq!(page.total, 3);
            }

            #[tokio::test]
            async fn test_search_disjunction_survives_window() {
                let rows = vec![
                    member(1, "Andy Roe"),
                    member(2, "Ann Lee"),
                    member_with_email(3, "Zed Smith", "anna@example.com"),
                    // match the window alone, never the search
                    member(4, "Bob Hart"),
                    member(5, "Carl Diaz"),
                    member(6, "Yuri Gold"),
                ];
                let pager = paginator_over($factory, &rows).await;
                let plan = SearchPlan::for_people(FULL_NAME_CI, EMAIL, "an", false);
                let base = org_scope().and(plan.filter);
                let request = PageRequest::new(base, plan.sort_field, page_size(2));

                let first = pager.fetch(&request).await.unwrap();
                assert_page(&first, &["andy roe", "ann lee"], false, true);
                assert_eq!(first.total, 3);

                let second = pager
                    .fetch(&request.clone().after(first.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_page(&second, &["zed smith"], true, false);
            }

            #[tokio::test]
            async fn test_folded_prefix_search() {
                let rows = members(&["Émile Zola", "emma stone", "Eric Idle", "Ümit Kaya"]);
                let pager = paginator_over($factory, &rows).await;

                let plan = SearchPlan::for_field(FULL_NAME_CI, "EM");
                let request =
                    PageRequest::new(org_scope().and(plan.filter), plan.sort_field, page_size(10));
                let page = pager.fetch(&request).await.unwrap();
                assert_page(&page, &["emile zola", "emma stone"], false, false);

                let plan = SearchPlan::for_field(FULL_NAME_CI, "umit");
                let request =
                    PageRequest::new(org_scope().and(plan.filter), plan.sort_field, page_size(10));
                let page = pager.fetch(&request).await.unwrap();
                assert_page(&page, &["umit kaya"], false, false);
            }

            #[tokio::test]
            async fn test_email_pivot_pages_by_email() {
                let rows = vec![
                    member_with_email(1, "Zulu Park", "zed@a.example"),
                    member_with_email(2, "Alpha Ray", "zed@b.example"),
                    member_with_email(3, "Mike Ng", "mike@example.com"),
                ];
                let pager = paginator_over($factory, &rows).await;

                let query = "ZED@";
                assert!(email_pivot_ok(query, "Active", true));
                let plan = SearchPlan::for_people(FULL_NAME_CI, EMAIL, query, true);
                assert_eq!(plan.sort_field, EMAIL);
                let request =
                    PageRequest::new(org_scope().and(plan.filter), plan.sort_field, page_size(1));

                let first = pager.fetch(&request).await.unwrap();
                assert_page(&first, &["zulu park"], false, true);
                assert_eq!(first.last_cursor.as_ref().unwrap().sort_key(), "zed@a.example");

                let second = pager
                    .fetch(&request.clone().after(first.last_cursor.clone().unwrap()))
                    .await
                    .unwrap();
                assert_page(&second, &["alpha ray"], true, false);
            }

            // ==================================================================
            // Edge cases
            // ==================================================================

            #[tokio::test]
            async fn test_malformed_cursor_serves_first_page() {
                let pager = paginator_over($factory, &members(&scenario_names())).await;

                for token in ["", "   ", "not-a-cursor", "eyJrIjoiYW5uIn0", "%%%"] {
                    let request = people_request(3).with_tokens(None, Some(token));
                    assert_eq!(request.keyset, KeysetConfig::first());
                    let page = pager.fetch(&request).await.unwrap();
                    assert_page(&page, &["ann", "bob", "cara"], false, true);
                }
            }

            #[tokio::test]
            async fn test_empty_collection() {
                let pager = paginator_over($factory, &[]).await;

                let page = pager.fetch(&people_request(3)).await.unwrap();
                assert!(page.is_empty());
                assert!(!page.has_prev && !page.has_next);
                assert!(page.first_cursor.is_none() && page.last_cursor.is_none());
                assert_eq!(page.total, 0);

                let outcome = pager.fetch_after_mutation(&people_request(3)).await.unwrap();
                assert_eq!(outcome.strategy, RecoveryStrategy::ResetToFirst);
                assert!(outcome.page.is_empty());
            }

            // ==================================================================
            // Recovery
            // ==================================================================

            #[tokio::test]
            async fn test_removing_rest_of_list_recovers_previous_page() {
                let store = $factory;
                let rows = members(&scenario_names());
                let pager = paginator_over(store.clone(), &rows).await;

                let first = pager.fetch(&people_request(3)).await.unwrap();
                let anchor = first.last_cursor.clone().unwrap();
                let second = pager
                    .fetch(&people_request(3).after(anchor.clone()))
                    .await
                    .unwrap();
                assert_page(&second, &["dev", "eve", "finn"], true, true);

                for id in 4..=7u128 {
                    store.delete(Uuid::from_u128(id)).await.unwrap();
                }

                let outcome = pager
                    .fetch_after_mutation(&people_request(3).after(anchor))
                    .await
                    .unwrap();
                assert_eq!(outcome.strategy, RecoveryStrategy::InclusiveBackward);
                assert_page(&outcome.page, &["ann", "bob", "cara"], false, false);
                assert_eq!(outcome.page.total, 3);
            }

            #[tokio::test]
            async fn test_explicit_recovery_probes_next() {
                let store = $factory;
                let pager = paginator_over(store.clone(), &members(&scenario_names())).await;

                let first = pager.fetch(&people_request(3)).await.unwrap();
                let anchor = first.last_cursor.clone().unwrap();
                for id in 4..=6u128 {
                    store.delete(Uuid::from_u128(id)).await.unwrap();
                }

                let outcome = pager.recover(&people_request(3).after(anchor)).await.unwrap();
                assert_eq!(outcome.strategy, RecoveryStrategy::InclusiveBackward);
                // "gus" survived, so the lookahead finds it
                assert_page(&outcome.page, &["ann", "bob", "cara"], false, true);
            }

            #[tokio::test]
            async fn test_removing_everything_resets_to_first() {
                let store = $factory;
                let pager = paginator_over(store.clone(), &members(&scenario_names())).await;

                let first = pager.fetch(&people_request(3)).await.unwrap();
                let anchor = first.last_cursor.clone().unwrap();
                for id in 1..=7u128 {
                    store.delete(Uuid::from_u128(id)).await.unwrap();
                }

                let outcome = pager
                    .fetch_after_mutation(&people_request(3).after(anchor))
                    .await
                    .unwrap();
                assert_eq!(outcome.strategy, RecoveryStrategy::ResetToFirst);
                assert!(outcome.page.is_empty());
                assert!(!outcome.page.has_prev && !outcome.page.has_next);
            }

            #[tokio::test]
            async fn test_unfiltered_scope_is_all() {
                let pager = paginator_over($factory, &members(&["ann", "bob"])).await;
                let request = PageRequest::new(Filter::All, FULL_NAME_CI, page_size(5));

                let page = pager.fetch(&request).await.unwrap();
                assert_page(&page, &["ann", "bob"], false, false);
            }
        }
    };
}
