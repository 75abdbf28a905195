use serde_json::Value;

use crate::types::ConfigMap;

/// Deep-merge `incoming` into `base` in place.
/// If both sides have an object for the same key, recurse.
/// Otherwise, `incoming`'s value wins.
pub fn deep_merge(base: &mut ConfigMap, incoming: ConfigMap) {
    for (key, incoming_val) in incoming {
        match (base.remove(&key), incoming_val) {
            (Some(Value::Object(mut base_obj)), Value::Object(incoming_obj)) => {
                deep_merge(&mut base_obj, incoming_obj);
                base.insert(key, Value::Object(base_obj));
            }
            (_, incoming_val) => {
                base.insert(key, incoming_val);
            }
        }
    }
}
