use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Formatter};
use core::marker::PhantomData;

use serde_core::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{Serialize, SerializeMap, Serializer};

use crate::{Mapping, Value};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Int(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::Sequence(v) => serializer.collect_seq(v),
            Value::Mapping(v) => v.serialize(serializer),
        }
    }
}

impl<V: Serialize> Serialize for Mapping<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

// -----------------------------------------------------------------------------
// Deserialize

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("any non-binary value")
    }

    #[inline]
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    // Integers beyond `i64::MAX` degrade to floats.
    #[inline]
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(match i64::try_from(v) {
            Ok(v) => Value::Int(v),
            Err(_) => Value::Float(v as f64),
        })
    }

    #[inline]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    #[inline]
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.into()))
    }

    #[inline]
    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    #[inline]
    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    #[inline]
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    #[inline]
    fn visit_newtype_struct<D: Deserializer<'de>>(
        self,
        deserializer: D,
    ) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or_default().min(4096));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Value, A::Error> {
        MappingVisitor(PhantomData).visit_map(map).map(Value::Mapping)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct MappingVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for MappingVisitor<V> {
    type Value = Mapping<V>;

    fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
        formatter.write_str("a map with string keys")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Mapping<V>, A::Error> {
        let mut output = Mapping::with_capacity(map.size_hint().unwrap_or_default().min(4096));
        while let Some((key, value)) = map.next_entry::<String, V>()? {
            output.insert(key, value);
        }
        Ok(output)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Mapping<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(MappingVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Mapping, Value};
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn json_keeps_key_order() {
        let text = r#"{"z":1,"a":[true,null,2.5],"m":{"k":"v"}}"#;
        let value: Value = serde_json::from_str(text).unwrap();

        let map = value.as_mapping().unwrap();
        assert_eq!(map.keys().collect::<vec::Vec<_>>(), ["z", "a", "m"]);
        assert_eq!(
            map.get("a"),
            Some(&Value::Sequence(vec![Value::Bool(true), Value::Null, Value::Float(2.5)]))
        );

        let back = serde_json::to_string(&value).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn large_unsigned_becomes_float() {
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(value, Value::Float(u64::MAX as f64));

        let value: Value = serde_json::from_str("42").unwrap();
        assert_eq!(value, Value::Int(42));
    }

    #[test]
    fn ron_mapping() {
        let map: Mapping = ron::from_str(r#"{ "name": "x", "size": 3 }"#).unwrap();
        assert_eq!(map.get("name"), Some(&Value::String(String::from("x"))));
        assert_eq!(map.get("size"), Some(&Value::Int(3)));
    }

    #[test]
    fn typed_mapping() {
        let map: Mapping<i64> = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
        assert_eq!(map.get("b"), Some(&2));
        assert!(serde_json::from_str::<Mapping<i64>>(r#"{"a":"x"}"#).is_err());
    }
}
