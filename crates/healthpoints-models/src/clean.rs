//! Record-cleaning pass applied before every write.

use serde_json::Value;

/// Strip transient and empty fields from a record so the wire payload carries
/// only meaningful data.
///
/// Removes null entries, empty strings, and nested object references without
/// a usable `id` (an unselected user lands in the form as `{"id": null}` or
/// an empty object). When `strip_id` is set the record's own `id` is removed
/// as well, as required for creation.
#[must_use]
pub fn clean_record(record: Value, strip_id: bool) -> Value {
    let Value::Object(map) = record else {
        return record;
    };

    let cleaned = map
        .into_iter()
        .filter(|(key, value)| {
            if strip_id && key == "id" {
                return false;
            }
            match value {
                Value::Null => false,
                Value::String(text) => !text.is_empty(),
                Value::Object(inner) => inner
                    .get("id")
                    .is_some_and(|id| !id.is_null() && id.as_i64() != Some(-1)),
                _ => true,
            }
        })
        .collect();

    Value::Object(cleaned)
}
