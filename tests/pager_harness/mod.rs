//! Shared test harness for pagination backend testing
//!
//! Provides `TestMember`, a record with a folded name, an email and an
//! organization scope, the `TestStore` seeding trait every backend under test
//! implements, and helper functions for building datasets and requests.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod pager_harness;
//! use pager_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
mod pager_tests;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use keyset::config::PagingConfig;
use keyset::core::field::FieldValue;
use keyset::core::filter::Filter;
use keyset::core::fold::fold;
use keyset::core::page::{PageRequest, PageResult, PageSize};
use keyset::core::record::Record;
use keyset::core::store::DocumentStore;
use keyset::core::window::SortField;
use keyset::paging::Paginator;
use keyset::storage::InMemoryStore;

pub const FULL_NAME_CI: SortField = SortField::from_static("full_name_ci");
pub const EMAIL: SortField = SortField::from_static("email");

pub const ORG: &str = "acme";
pub const OTHER_ORG: &str = "globex";

// ---------------------------------------------------------------------------
// TestMember
// ---------------------------------------------------------------------------

/// An organization member as a people list shows it.
///
/// Fields:
/// - `full_name`: display value
/// - `full_name_ci`: folded projection of `full_name`, the default sort key
/// - `email`: lowercased, the pivot sort key
/// - `org`, `status`: scope fields used in base filters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestMember {
    pub id: Uuid,
    pub full_name: String,
    pub full_name_ci: String,
    pub email: String,
    pub org: String,
    pub status: String,
}

impl Record for TestMember {
    fn collection() -> &'static str {
        "test_members"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "full_name" => Some(FieldValue::String(self.full_name.clone())),
            "full_name_ci" => Some(FieldValue::String(self.full_name_ci.clone())),
            "email" => Some(FieldValue::String(self.email.clone())),
            "org" => Some(FieldValue::String(self.org.clone())),
            "status" => Some(FieldValue::String(self.status.clone())),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Backends under test
// ---------------------------------------------------------------------------

/// A store the contract tests can seed and mutate.
#[async_trait]
pub trait TestStore: DocumentStore<TestMember> + Clone + Send + Sync + 'static {
    async fn seed(&self, members: &[TestMember]) -> Result<()>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

#[async_trait]
impl TestStore for InMemoryStore<TestMember> {
    async fn seed(&self, members: &[TestMember]) -> Result<()> {
        for member in members {
            self.insert(member.clone())?;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.remove(&id)?;
        Ok(())
    }
}

/// Seed `store` with `rows` and wrap it in a paginator with default settings.
///
/// The returned paginator shares the store, so later mutations through the
/// caller's handle are visible to it.
pub async fn paginator_over<S: TestStore>(
    store: S,
    rows: &[TestMember],
) -> Paginator<TestMember, S> {
    store.seed(rows).await.expect("Failed to seed test members");
    Paginator::new(Arc::new(store), &PagingConfig::default())
}

// ---------------------------------------------------------------------------
// Helper functions: TestMember creation
// ---------------------------------------------------------------------------

/// Create a member of `ORG` with a deterministic id (`n` as a u128).
///
/// The email is derived from the folded name.
pub fn member(n: u128, full_name: &str) -> TestMember {
    let local = fold(full_name).replace(' ', ".");
    member_with_email(n, full_name, &format!("{}@example.com", local))
}

pub fn member_with_email(n: u128, full_name: &str, email: &str) -> TestMember {
    TestMember {
        id: Uuid::from_u128(n),
        full_name: full_name.to_string(),
        full_name_ci: fold(full_name),
        email: email.trim().to_lowercase(),
        org: ORG.to_string(),
        status: "active".to_string(),
    }
}

/// Members named after `names`, ids 1..=n in the same order
pub fn members(names: &[&str]) -> Vec<TestMember> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| member(i as u128 + 1, name))
        .collect()
}

/// The seven-name dataset used by the walkthrough scenarios
pub fn scenario_names() -> Vec<&'static str> {
    vec!["ann", "bob", "cara", "dev", "eve", "finn", "gus"]
}

/// `n` members whose names sort in id order: `member_000`, `member_001`, ...
pub fn numbered(n: usize) -> Vec<TestMember> {
    (0..n)
        .map(|i| member(i as u128 + 1, &format!("member_{:03}", i)))
        .collect()
}

/// Base filter of every list in the contract tests
pub fn org_scope() -> Filter {
    Filter::eq("org", ORG)
}

/// First-page request over `org_scope()` sorted by folded name
pub fn people_request(size: usize) -> PageRequest {
    PageRequest::new(org_scope(), FULL_NAME_CI, page_size(size))
}

pub fn page_size(n: usize) -> PageSize {
    PageSize::new(n).expect("test page sizes are positive")
}

/// Folded names of a page, in display order
pub fn names(page: &PageResult<TestMember>) -> Vec<String> {
    page.items.iter().map(|m| m.full_name_ci.clone()).collect()
}

// ---------------------------------------------------------------------------
// Assertions helpers
// ---------------------------------------------------------------------------

/// Assert a page's folded names and both boundary flags.
pub fn assert_page(
    page: &PageResult<TestMember>,
    expected: &[&str],
    has_prev: bool,
    has_next: bool,
) {
    assert_eq!(names(page), expected, "unexpected page contents");
    assert_eq!(page.has_prev, has_prev, "has_prev mismatch for {:?}", expected);
    assert_eq!(page.has_next, has_next, "has_next mismatch for {:?}", expected);
}

/// Assert rows are strictly increasing in `(full_name_ci, id)`.
pub fn assert_ordered(rows: &[TestMember]) {
    for pair in rows.windows(2) {
        let a = (pair[0].full_name_ci.as_bytes(), pair[0].id);
        let b = (pair[1].full_name_ci.as_bytes(), pair[1].id);
        assert!(a < b, "rows out of order: {:?} before {:?}", pair[0], pair[1]);
    }
}
