//! The document abstraction the engine pages over

use crate::core::field::FieldValue;
use uuid::Uuid;

/// Name under which every record exposes its tiebreak identifier.
pub const ID_FIELD: &str = "id";

/// A document that can be listed with keyset pagination.
///
/// Every record has:
/// - id: a unique identifier, totally ordered, used to break ties between
///   rows that share the same sort key
/// - named fields reachable through `field_value`, including the folded
///   projections (`name_ci`, `full_name_ci`, ...) that list views sort on
///
/// The `id` is also reachable as `field_value(ID_FIELD)` so filters can
/// constrain it like any other field.
pub trait Record: Clone + Send + Sync + 'static {
    /// Collection name used by document backends (e.g., "users", "groups")
    fn collection() -> &'static str;

    /// Get the unique identifier for this record
    fn id(&self) -> Uuid;

    /// Get the value of a specific field by name
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Folded sort key for `field`, `None` when the field is missing or not
    /// a string.
    ///
    /// A row without a key has no cursor position; the paginator refuses to
    /// page over it rather than skip it.
    fn sort_key(&self, field: &str) -> Option<String> {
        match self.field_value(field) {
            Some(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Field lookup that also answers for `ID_FIELD`
    fn lookup(&self, field: &str) -> Option<FieldValue> {
        if field == ID_FIELD {
            return Some(FieldValue::Uuid(self.id()));
        }
        self.field_value(field)
    }
}
