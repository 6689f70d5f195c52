//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoStore<T>`, a [`DocumentStore`] backed by a collection of a
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! keyset-pager = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Each `MongoStore<T>` operates on the collection named by
//! `T::collection()`. The record id is stored as `_id`, as a hyphenated
//! lowercase UUID string, whose byte order matches UUID order, so the
//! `(sort_field, _id)` compound sort is the same order the in-memory store
//! uses.
//!
//! # Filter translation
//!
//! Conjunctions become `$and` arrays and disjunctions become `$or` arrays.
//! Conditions are never merged into a single document by key: merging a
//! keyset window into a search filter that already has a top-level `$or`
//! would replace the search instead of narrowing it.

use crate::core::field::FieldValue;
use crate::core::filter::{CmpOp, Filter};
use crate::core::record::{ID_FIELD, Record};
use crate::core::store::{DocumentStore, FindQuery};
use crate::core::window::SortField;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::{Database, IndexModel};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document,
/// renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| anyhow!("Failed to convert JSON to BSON: {}", e))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => return Err(anyhow!("Expected BSON document, got non-object")),
    };

    if let Some(id) = doc.remove(ID_FIELD) {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value,
/// renaming `_id` → `id` for domain record convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert(ID_FIELD, id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

/// Stored name of a record field
fn field_name(field: &str) -> &str {
    if field == ID_FIELD { "_id" } else { field }
}

/// BSON form of a filter operand, matching how records are serialized
fn value_bson(value: &FieldValue) -> Bson {
    match value {
        FieldValue::String(s) => Bson::String(s.clone()),
        FieldValue::Integer(i) => Bson::Int64(*i),
        FieldValue::Float(f) => Bson::Double(*f),
        FieldValue::Boolean(b) => Bson::Boolean(*b),
        FieldValue::Uuid(u) => uuid_bson(u),
        FieldValue::DateTime(dt) => Bson::String(dt.to_rfc3339()),
        FieldValue::Null => Bson::Null,
    }
}

fn cmp_operator(op: CmpOp) -> &'static str {
    match op {
        CmpOp::Gt => "$gt",
        CmpOp::Gte => "$gte",
        CmpOp::Lt => "$lt",
        CmpOp::Lte => "$lte",
    }
}

fn condition(field: &str, operator: &str, value: Bson) -> Document {
    let mut inner = Document::new();
    inner.insert(operator, value);
    let mut outer = Document::new();
    outer.insert(field_name(field), inner);
    outer
}

fn list_bson(values: &[FieldValue]) -> Bson {
    Bson::Array(values.iter().map(value_bson).collect())
}

/// Translate a filter into a MongoDB query document.
///
/// ```text
/// And[a, Or[b, c]]  =>  { "$and": [ a, { "$or": [ b, c ] } ] }
/// ```
pub fn filter_to_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::Eq(field, value) => condition(field, "$eq", value_bson(value)),
        Filter::Ne(field, value) => condition(field, "$ne", value_bson(value)),
        Filter::In(field, values) => condition(field, "$in", list_bson(values)),
        Filter::NotIn(field, values) => condition(field, "$nin", list_bson(values)),
        Filter::Cmp(field, op, value) => condition(field, cmp_operator(*op), value_bson(value)),
        Filter::And(clauses) if clauses.is_empty() => Document::new(),
        Filter::And(clauses) => {
            let clauses: Vec<Document> = clauses.iter().map(filter_to_document).collect();
            doc! { "$and": clauses }
        }
        // $or requires a non-empty array; an empty disjunction matches nothing
        Filter::Or(branches) if branches.is_empty() => {
            doc! { "_id": { "$in": Bson::Array(Vec::new()) } }
        }
        Filter::Or(branches) => {
            let branches: Vec<Document> = branches.iter().map(filter_to_document).collect();
            doc! { "$or": branches }
        }
    }
}

// ---------------------------------------------------------------------------
// MongoStore<T>
// ---------------------------------------------------------------------------

/// Document store backed by MongoDB.
///
/// # Type bounds
///
/// `T` must implement:
/// - `Record`: id, fields and collection name
/// - `Serialize`: for writing records as BSON
/// - `DeserializeOwned`: for reading BSON back into records
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use keyset::storage::MongoStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let store = MongoStore::<Member>::new(client.database("app"));
/// store.ensure_sort_index(&SortField::from_static("full_name_ci")).await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoStore<T> {
    database: Database,
    _marker: std::marker::PhantomData<T>,
}

impl<T> MongoStore<T> {
    /// Create a new `MongoStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: std::marker::PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<T: Record + Serialize + DeserializeOwned> MongoStore<T> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(T::collection())
    }

    fn record_to_document(record: &T) -> Result<Document> {
        let json = serde_json::to_value(record)
            .map_err(|e| anyhow!("Failed to serialize record: {}", e))?;
        json_to_document(json)
    }

    fn document_to_record(doc: Document) -> Result<T> {
        let json = document_to_json(doc);
        serde_json::from_value(json)
            .map_err(|e| anyhow!("Failed to deserialize record from document: {}", e))
    }

    /// Create the `(field, _id)` index that keyset reads on `field` rely on
    pub async fn ensure_sort_index(&self, field: &SortField) -> Result<()> {
        let mut keys = Document::new();
        keys.insert(field.as_str(), 1);
        keys.insert("_id", 1);
        self.collection()
            .create_index(IndexModel::builder().keys(keys).build())
            .await
            .map_err(|e| anyhow!("Failed to create index on '{}': {}", field, e))?;

        Ok(())
    }

    /// Insert or replace a record
    pub async fn insert(&self, record: &T) -> Result<()> {
        let doc = Self::record_to_document(record)?;

        self.collection()
            .replace_one(doc! { "_id": uuid_bson(&record.id()) }, doc)
            .upsert(true)
            .await
            .map_err(|e| anyhow!("Failed to insert record: {}", e))?;

        Ok(())
    }

    /// Remove a record by id.
    ///
    /// Silently succeeds if the record does not exist (idempotent).
    pub async fn remove(&self, id: &Uuid) -> Result<()> {
        self.collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| anyhow!("Failed to remove record: {}", e))?;

        Ok(())
    }
}

#[async_trait]
impl<T: Record + Serialize + DeserializeOwned> DocumentStore<T> for MongoStore<T> {
    async fn find(&self, query: &FindQuery) -> Result<Vec<T>> {
        let order = query.order.as_i32();
        let mut sort = Document::new();
        sort.insert(query.sort_field.as_str(), order);
        sort.insert("_id", order);

        let cursor = self
            .collection()
            .find(filter_to_document(&query.filter))
            .sort(sort)
            .limit(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .await
            .map_err(|e| anyhow!("Failed to find records: {}", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| anyhow!("Failed to collect records: {}", e))?;

        docs.into_iter().map(Self::document_to_record).collect()
    }

    async fn count(&self, filter: &Filter) -> Result<u64> {
        self.collection()
            .count_documents(filter_to_document(filter))
            .await
            .map_err(|e| anyhow!("Failed to count records: {}", e))
    }
}
