//! Field codecs shared by catalog records.
//!
//! Catalog data arrives in two shapes: the bundled catalog writes size lists
//! as `[{size, image}]`, the REST backend as `{"1/2": "url"}` maps with
//! nullable URLs. Both decode into the same ordered list.

use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::SizeEntry;

/// Decode `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a blank or `null` string as `None`.
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Decode a size list from either a sequence of entries or a label map.
pub(crate) fn size_list<'de, D>(deserializer: D) -> Result<Vec<SizeEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(SizeListVisitor)
}

struct SizeListVisitor;

impl<'de> Visitor<'de> for SizeListVisitor {
    type Value = Vec<SizeEntry>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of size entries or a map of size label to image")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Vec::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<SizeEntry>()? {
            entries.push(entry);
        }
        Ok(entries)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((size, image)) = map.next_entry::<String, Option<String>>()? {
            entries.push(SizeEntry::new(size, image.unwrap_or_default()));
        }
        Ok(entries)
    }
}

/// Ordered technical specification table (`"Pressão Máxima" -> "150 PSI"`).
///
/// Serialized as a JSON object in insertion order; decoded from an object or
/// from a list of `[key, value]` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Specifications(Vec<(String, String)>);

impl Specifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row, replacing the value of an existing key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(row) => row.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Specifications {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut specs = Specifications::new();
        for (k, v) in iter {
            specs.insert(k, v);
        }
        specs
    }
}

impl Serialize for Specifications {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Specifications {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SpecificationsVisitor)
    }
}

struct SpecificationsVisitor;

impl<'de> Visitor<'de> for SpecificationsVisitor {
    type Value = Specifications;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of specification name to value or a list of pairs")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Specifications::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Specifications::new())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut specs = Specifications::new();
        while let Some((key, value)) = map.next_entry::<String, SpecValue>()? {
            specs.insert(key, value.0);
        }
        Ok(specs)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut specs = Specifications::new();
        while let Some((key, value)) = seq.next_element::<(String, SpecValue)>()? {
            specs.insert(key, value.0);
        }
        Ok(specs)
    }
}

/// Specification values are text, but editors sometimes store bare numbers.
struct SpecValue(String);

impl<'de> Deserialize<'de> for SpecValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(SpecValue(match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "size_list")]
        sizes: Vec<SizeEntry>,
        #[serde(default)]
        specifications: Specifications,
    }

    #[test]
    fn test_size_list_from_map_keeps_order() {
        let h: Holder =
            serde_json::from_str(r#"{"sizes": {"2": "/b.jpg", "1/2": "/a.jpg", "1": null}}"#)
                .unwrap();
        let labels: Vec<&str> = h.sizes.iter().map(|s| s.size.as_str()).collect();
        assert_eq!(labels, vec!["2", "1/2", "1"]);
        assert_eq!(h.sizes[2].image, "");
    }

    #[test]
    fn test_size_list_from_entries_and_null() {
        let h: Holder =
            serde_json::from_str(r#"{"sizes": [{"size": "1/2\"", "image": "/x.jpg"}]}"#).unwrap();
        assert_eq!(h.sizes[0].size, "1/2\"");

        let h: Holder = serde_json::from_str(r#"{"sizes": null}"#).unwrap();
        assert!(h.sizes.is_empty());
    }

    #[test]
    fn test_specifications_order_and_numbers() {
        let h: Holder = serde_json::from_str(
            r#"{"specifications": {"Vedação": "PTFE", "Pressão": 150, "Classe": "A"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> = h.specifications.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Vedação", "Pressão", "Classe"]);
        assert_eq!(h.specifications.get("Pressão"), Some("150"));

        let json = serde_json::to_string(&h.specifications).unwrap();
        assert!(json.starts_with(r#"{"Vedação""#));
    }

    #[test]
    fn test_specifications_from_pairs() {
        let h: Holder =
            serde_json::from_str(r#"{"specifications": [["a", "1"], ["b", "2"]]}"#).unwrap();
        assert_eq!(h.specifications.len(), 2);
        assert_eq!(h.specifications.get("b"), Some("2"));
    }
}
