//! In-memory bridge to [`serde_json::Value`], for encoders that walk the
//! tree. Date/times become RFC 3339 strings and binary values base64
//! strings; neither survives the trip back as its original variant.

use serde_json::{Map, Number, Value};

use crate::error::TreeError;
use crate::node::{Array, Node, Object};
use crate::scalar::Scalar;

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::null(),
            Value::Bool(b) => Node::from(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::from(i),
                None => n.as_f64().map_or_else(Node::null, Node::from),
            },
            Value::String(s) => Node::from(s),
            Value::Array(items) => Node::from(items.into_iter().map(Node::from).collect::<Array>()),
            Value::Object(map) => Node::from(map.into_iter().collect::<Object>()),
        }
    }
}

impl TryFrom<Value> for Object {
    type Error = TreeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match Node::from(value) {
            Node::Object(object) => Ok(std::sync::Arc::unwrap_or_clone(object)),
            other => Err(TreeError::TypeMismatch {
                path: String::new(),
                expected: "object",
                found: other.kind(),
            }),
        }
    }
}

impl Node {
    pub fn to_json_value(&self) -> Value {
        match self {
            Node::Scalar(scalar) => scalar_to_json(scalar),
            Node::Object(object) => object.to_json_value(),
            Node::Array(array) => Value::Array(array.iter().map(Node::to_json_value).collect()),
        }
    }
}

impl Object {
    pub fn to_json_value(&self) -> Value {
        let mut map = Map::with_capacity(self.len());
        for (key, value) in self.iter() {
            map.insert(key.to_string(), value.to_json_value());
        }
        Value::Object(map)
    }
}

fn scalar_to_json(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::Number((*i).into()),
        // NaN and infinities have no JSON form.
        Scalar::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Scalar::String(s) => Value::String(s.clone()),
        Scalar::DateTime(_) | Scalar::Binary(_) => scalar.to_text().map_or(Value::Null, Value::String),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_order_and_types() {
        let node = Node::from(json!({"z": 1, "a": [true, null, 1.5, "s"], "m": {}}));
        let object = node.as_object().unwrap();
        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        let arr = object.get("a").unwrap().as_array().unwrap();
        assert_eq!(arr.get(0), Some(&Node::from(true)));
        assert!(arr.get(1).unwrap().is_null());
        assert_eq!(arr.get(2), Some(&Node::from(1.5)));
        assert!(object.get("m").unwrap().is_object());
    }

    #[test]
    fn test_to_json() {
        let mut object = Object::new();
        object.insert("when", Utc.with_ymd_and_hms(2021, 5, 6, 7, 8, 9).unwrap());
        object.insert("data", b"hi".to_vec());
        object.insert("nan", f64::NAN);
        object.insert("n", 3);
        assert_eq!(
            object.to_json_value(),
            json!({"when": "2021-05-06T07:08:09Z", "data": "aGk=", "nan": null, "n": 3})
        );
    }

    #[test]
    fn test_json_identity() {
        let value = json!({"a": {"b": [1, {"c": "d"}]}, "e": false});
        assert_eq!(Node::from(value.clone()).to_json_value(), value);
    }

    #[test]
    fn test_object_try_from() {
        assert!(Object::try_from(json!({"a": 1})).is_ok());
        assert!(matches!(
            Object::try_from(json!([1])),
            Err(TreeError::TypeMismatch { found: "array", .. })
        ));
    }
}
