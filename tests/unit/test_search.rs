//! Unit tests for search and pagination state
//!
//! Tests cover:
//! - Deep links with missing or malformed parameters
//! - A typing burst collapsed by the debouncer into one commit
//! - History behaviour across search, filter and pagination

use politicos::search::descriptor::{next_page_size, PAGE_SIZES};
use politicos::search::{Debouncer, HistoryMode, QueryDescriptor, SearchSync};
use politicos::Gender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Deep links
// ============================================================================

mod deep_link_tests {
    use super::*;

    #[test]
    fn test_malformed_values_fall_back() {
        let d = QueryDescriptor::from_url("/politicians?page=abc&perPage=-5&gender=x", 10);
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
        assert_eq!(d.gender, None);
    }

    #[test]
    fn test_absolute_url_with_fragment() {
        let d = QueryDescriptor::from_url(
            "http://localhost:5173/politicians?page=3&name=Ana%20Mar%C3%ADa#top",
            10,
        );
        assert_eq!(d.page, 3);
        assert_eq!(d.name.as_deref(), Some("Ana María"));
    }

    #[test]
    fn test_canonical_url_round_trips() {
        let d = QueryDescriptor::from_url("/politicians?gender=Hombre&name=Jo&perPage=50&page=4", 10);
        assert_eq!(QueryDescriptor::from_url(&d.to_url(), 10), d);
    }

    #[test]
    fn test_default_page_size_comes_from_caller() {
        let s = SearchSync::new("/politicians", 20);
        assert_eq!(s.current_url(), "/politicians?page=1&perPage=20");
    }

    #[test]
    fn test_page_size_cycle() {
        let mut size = PAGE_SIZES[0];
        let mut seen = vec![size];
        for _ in 0..PAGE_SIZES.len() {
            size = next_page_size(size);
            seen.push(size);
        }
        assert_eq!(seen, vec![10, 20, 50, 100, 10]);
    }
}

// ============================================================================
// Debounced search
// ============================================================================

mod debounce_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_typing_burst_commits_once_with_last_value() {
        let sync = Arc::new(Mutex::new(SearchSync::new("/politicians?page=4", 10)));
        let commits = Arc::new(Mutex::new(Vec::new()));

        let (s, c) = (Arc::clone(&sync), Arc::clone(&commits));
        let mut debouncer = Debouncer::new(Duration::from_millis(300), move |term: String| {
            if let Some(commit) = s.lock().unwrap().commit_search(&term) {
                c.lock().unwrap().push(commit);
            }
        });

        for text in ["J", "Ja", "Jan", "Jane"] {
            sync.lock().unwrap().on_search_input(text);
            debouncer.call(text.to_string());
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        assert!(commits.lock().unwrap().is_empty());

        tokio::time::advance(Duration::from_millis(250)).await;
        tokio::task::yield_now().await;

        let commits = commits.lock().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].descriptor.name.as_deref(), Some("Jane"));
        assert_eq!(commits[0].descriptor.page, 1);
        assert_eq!(commits[0].mode, HistoryMode::Replace);
        assert_eq!(sync.lock().unwrap().history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_commits_immediately() {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let f = Arc::clone(&fired);
        let mut debouncer = Debouncer::new(Duration::from_millis(300), move |term: String| {
            f.lock().unwrap().push(term);
        });

        debouncer.call("Jane".to_string());
        assert!(debouncer.flush());
        assert!(!debouncer.flush());

        tokio::time::advance(Duration::from_millis(500)).await;
        tokio::task::yield_now().await;
        assert_eq!(*fired.lock().unwrap(), vec!["Jane".to_string()]);
    }
}

// ============================================================================
// History
// ============================================================================

mod history_tests {
    use super::*;

    #[test]
    fn test_filter_then_paginate_then_back() {
        let mut s = SearchSync::new("/politicians", 10);
        s.select_gender("Mujer").unwrap();
        s.on_pagination_change(s.pagination().next()).unwrap();
        s.on_pagination_change(s.pagination().next()).unwrap();
        assert_eq!(s.history().len(), 3);

        let back = s.back().unwrap();
        assert_eq!(back.descriptor.page, 2);
        assert_eq!(back.descriptor.gender, Some(Gender::Mujer));
    }

    #[test]
    fn test_resize_pushes_and_resets_page() {
        let mut s = SearchSync::new("/politicians?page=3", 10);
        let resized = s.pagination().resized(50);
        let commit = s.on_pagination_change(resized).unwrap();
        assert_eq!(commit.mode, HistoryMode::Push);
        assert_eq!(commit.descriptor.page, 1);
        assert_eq!(commit.descriptor.per_page, 50);
    }

    #[test]
    fn test_tickets_from_superseded_queries_are_rejected() {
        let mut s = SearchSync::new("/politicians", 10);
        let tickets: Vec<_> = (0..3)
            .map(|_| {
                s.on_pagination_change(s.pagination().next()).unwrap();
                s.ticket()
            })
            .collect();
        assert!(!s.accepts(&tickets[0]));
        assert!(!s.accepts(&tickets[1]));
        assert!(s.accepts(&tickets[2]));
    }
}
