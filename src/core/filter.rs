//! Boolean predicates over records
//!
//! A [`Filter`] is the backend-neutral form of a document query condition.
//! Authorization layers build the base filter, search adds prefix ranges,
//! and the window builder adds the keyset bound. Backends either evaluate
//! it directly ([`Filter::matches`]) or translate it (BSON for MongoDB).
//!
//! Composition is explicit: [`Filter::and`] always nests both sides as
//! conjuncts. There is no way to "merge" a condition into an existing `Or`,
//! so `A OR B` can never silently become `A OR B OR C`.

use crate::core::field::FieldValue;
use crate::core::record::Record;
use std::cmp::Ordering;

/// Comparison used by range conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CmpOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Gte => ordering != Ordering::Less,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Lte => ordering != Ordering::Greater,
        }
    }
}

/// A predicate over named record fields
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every record
    All,
    Eq(String, FieldValue),
    Ne(String, FieldValue),
    In(String, Vec<FieldValue>),
    NotIn(String, Vec<FieldValue>),
    Cmp(String, CmpOp, FieldValue),
    And(Vec<Filter>),
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn ne(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Ne(field.into(), value.into())
    }

    pub fn is_in(field: impl Into<String>, values: Vec<FieldValue>) -> Self {
        Filter::In(field.into(), values)
    }

    pub fn not_in(field: impl Into<String>, values: Vec<FieldValue>) -> Self {
        Filter::NotIn(field.into(), values)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Cmp(field.into(), CmpOp::Gt, value.into())
    }

    pub fn gte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Cmp(field.into(), CmpOp::Gte, value.into())
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Cmp(field.into(), CmpOp::Lt, value.into())
    }

    pub fn lte(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Filter::Cmp(field.into(), CmpOp::Lte, value.into())
    }

    /// Conjunction of two filters; `All` is the identity.
    ///
    /// An `And` on the left is extended in place. Anything else, including an
    /// `Or`, is kept whole as one conjunct.
    pub fn and(self, other: Filter) -> Filter {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }

    /// Conjunction of every clause, skipping `All`
    pub fn all_of(clauses: impl IntoIterator<Item = Filter>) -> Filter {
        clauses.into_iter().fold(Filter::All, Filter::and)
    }

    /// Disjunction of every branch
    pub fn any_of(branches: impl IntoIterator<Item = Filter>) -> Filter {
        let mut branches: Vec<Filter> = branches.into_iter().collect();
        if branches.iter().any(|b| matches!(b, Filter::All)) {
            return Filter::All;
        }
        match branches.len() {
            1 => branches.remove(0),
            _ => Filter::Or(branches),
        }
    }

    /// Whether the top level of this filter is a disjunction
    pub fn is_disjunction(&self) -> bool {
        matches!(self, Filter::Or(_))
    }

    /// Evaluate against a record
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => record
                .lookup(field)
                .is_some_and(|v| v.same_as(value)),
            Filter::Ne(field, value) => !record
                .lookup(field)
                .is_some_and(|v| v.same_as(value)),
            Filter::In(field, values) => record
                .lookup(field)
                .is_some_and(|v| values.iter().any(|candidate| v.same_as(candidate))),
            Filter::NotIn(field, values) => !record
                .lookup(field)
                .is_some_and(|v| values.iter().any(|candidate| v.same_as(candidate))),
            Filter::Cmp(field, op, value) => record
                .lookup(field)
                .and_then(|v| v.compare(value))
                .is_some_and(|ordering| op.accepts(ordering)),
            Filter::And(clauses) => clauses.iter().all(|c| c.matches(record)),
            // An empty disjunction matches nothing.
            Filter::Or(branches) => branches.iter().any(|b| b.matches(record)),
        }
    }
}
