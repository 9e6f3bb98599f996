//! Record ids are integers in the database and strings on the wire.

use serde::{Deserialize, Deserializer, Serializer, de};

pub fn serialize<S: Serializer>(id: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id '{s}'"))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Body {
        #[serde(with = "crate::types::id")]
        id: i64,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let a: Body = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        let b: Body = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(a.id, 42);
        assert_eq!(b.id, 42);
        assert!(serde_json::from_str::<Body>(r#"{"id": "abc"}"#).is_err());
    }
}
