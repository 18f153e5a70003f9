use bson::{Bson, Document as BsonDocument};
use chrono::SecondsFormat;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Name of the store's primary key field.
pub const STORE_ID_FIELD: &str = "_id";

/// Key under which the identifier is exposed in API responses.
pub const ENTITY_ID_KEY: &str = "id";

/// A catalog document as returned by the API: its store identifier plus the
/// stored attributes, echoed verbatim.
///
/// Brands and items share this shape. The service never interprets the
/// attribute bag beyond the fields it filters and orders on.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Store-assigned identifier, unique within the collection.
    pub id: String,
    /// Stored attributes in stored order, without the store's `_id`.
    pub attributes: Map<String, Value>,
}

impl Entity {
    pub fn new(id: impl Into<String>, attributes: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Look up an attribute by dotted path (`category.name`).
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.attributes.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Build an entity from a raw store document.
    ///
    /// Documents without an `_id` get an empty identifier; the store never
    /// hands those out for persisted documents.
    pub fn from_document(mut doc: BsonDocument) -> Self {
        let id = doc
            .remove(STORE_ID_FIELD)
            .map(identifier_to_string)
            .unwrap_or_default();

        let attributes = doc
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect();

        Self { id, attributes }
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let stored = self
            .attributes
            .iter()
            .filter(|(key, _)| key.as_str() != ENTITY_ID_KEY);

        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ENTITY_ID_KEY, &self.id)?;
        for (key, value) in stored {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn identifier_to_string(id: Bson) -> String {
    match id {
        Bson::String(s) => s,
        Bson::ObjectId(oid) => oid.to_hex(),
        other => match bson_to_json(other) {
            Value::String(s) => s,
            value => value.to_string(),
        },
    }
}

/// Convert a stored BSON value into the JSON shape clients receive.
///
/// Timestamps become RFC 3339 strings and object ids become hex strings;
/// everything else follows relaxed extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        Bson::DateTime(dt) => {
            Value::String(dt.to_chrono().to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        other => other.into_relaxed_extjson(),
    }
}
