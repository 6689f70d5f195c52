//! Prefix search expressed in the sort key space
//!
//! A search never adds a second ordering dimension: it becomes a key range on
//! the same folded field the list is sorted by, so results page exactly like
//! an unfiltered list.

use crate::core::filter::Filter;
use crate::core::fold::PrefixRange;
use crate::core::window::SortField;

/// Normalize an email-like query: trimmed and lowercased, accents kept
pub fn fold_email(text: &str) -> String {
    text.trim().to_lowercase()
}

fn range_filter(field: &str, range: PrefixRange) -> Filter {
    Filter::And(vec![
        Filter::gte(field, range.lower),
        Filter::lt(field, range.upper),
    ])
}

/// `field` starts with the folded `query`; `None` for a blank query
pub fn prefix_filter(field: &SortField, query: &str) -> Option<Filter> {
    PrefixRange::for_query(query).map(|range| range_filter(field.as_str(), range))
}

/// Two-field search: folded name prefix OR email prefix.
///
/// The result is a top-level disjunction and must only ever be combined with
/// other conditions through [`Filter::and`].
pub fn name_or_email_filter(
    name_field: &SortField,
    email_field: &SortField,
    query: &str,
) -> Option<Filter> {
    let name = PrefixRange::for_query(query).map(|r| range_filter(name_field.as_str(), r));
    let email =
        PrefixRange::for_folded(fold_email(query)).map(|r| range_filter(email_field.as_str(), r));
    match (name, email) {
        (Some(name), Some(email)) => Some(Filter::Or(vec![name, email])),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

fn equals_any_fold(s: &str, values: &[&str]) -> bool {
    let s = s.trim().to_lowercase();
    values.iter().any(|v| s == v.to_lowercase())
}

/// Whether an org-scoped people list may order by email instead of name.
///
/// Requires an email-looking query (contains `@`), a status fixed to
/// `active` or `disabled`, and an organization constraint.
pub fn email_pivot_ok(search: &str, status: &str, has_org: bool) -> bool {
    email_pivot_no_org_ok(search, status) && has_org
}

/// [`email_pivot_ok`] for lists that span all organizations
pub fn email_pivot_no_org_ok(search: &str, status: &str) -> bool {
    search.contains('@') && equals_any_fold(status, &["active", "disabled"])
}

/// Filter and ordering for a people list (members, leaders, users)
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    pub filter: Filter,
    pub sort_field: SortField,
}

impl SearchPlan {
    /// Plan a people search.
    ///
    /// When the email pivot applies, the list is both searched and ordered
    /// by email; otherwise the query matches name or email and the list is
    /// ordered by folded name.
    pub fn for_people(
        name_field: SortField,
        email_field: SortField,
        query: &str,
        pivot: bool,
    ) -> Self {
        if pivot {
            let filter = PrefixRange::for_folded(fold_email(query))
                .map(|r| range_filter(email_field.as_str(), r))
                .unwrap_or(Filter::All);
            return Self {
                filter,
                sort_field: email_field,
            };
        }
        Self {
            filter: name_or_email_filter(&name_field, &email_field, query).unwrap_or(Filter::All),
            sort_field: name_field,
        }
    }

    /// Plan a single-field search sorted on the same field
    pub fn for_field(field: SortField, query: &str) -> Self {
        Self {
            filter: prefix_filter(&field, query).unwrap_or(Filter::All),
            sort_field: field,
        }
    }
}
