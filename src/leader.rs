use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

pub const PAGE_URL_FIELD: &str = "wikipedia_url";
pub const BIO_FIELD: &str = "bio";

// API fields kept as-is, in API order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leader {
    fields: Map<String, Value>,
}

impl Leader {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn has_page_url(&self) -> bool {
        self.fields.contains_key(PAGE_URL_FIELD)
    }

    pub fn page_url(&self) -> Option<&str> {
        self.get(PAGE_URL_FIELD).and_then(Value::as_str)
    }

    pub fn bio(&self) -> Option<&str> {
        self.get(BIO_FIELD).and_then(Value::as_str)
    }

    pub fn with_bio(mut self, bio: String) -> Self {
        self.fields.insert(BIO_FIELD.to_string(), Value::String(bio));
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadersByCountry {
    entries: Vec<(String, Vec<Leader>)>,
}

impl LeadersByCountry {
    pub fn new() -> Self {
        Self::default()
    }

    // an existing country keeps its position
    pub fn insert(&mut self, country: String, leaders: Vec<Leader>) {
        match self.entries.iter_mut().find(|(c, _)| *c == country) {
            Some((_, existing)) => *existing = leaders,
            None => self.entries.push((country, leaders)),
        }
    }

    pub fn get(&self, country: &str) -> Option<&[Leader]> {
        self.entries
            .iter()
            .find(|(c, _)| c == country)
            .map(|(_, leaders)| leaders.as_slice())
    }

    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leader_count(&self) -> usize {
        self.entries.iter().map(|(_, l)| l.len()).sum()
    }
}

impl Serialize for LeadersByCountry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (country, leaders) in &self.entries {
            map.serialize_entry(country, leaders)?;
        }
        map.end()
    }
}

struct LeadersByCountryVisitor;

impl<'de> Visitor<'de> for LeadersByCountryVisitor {
    type Value = LeadersByCountry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of country codes to leader lists")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut out = LeadersByCountry::new();
        while let Some((country, leaders)) = access.next_entry::<String, Vec<Leader>>()? {
            out.insert(country, leaders);
        }
        Ok(out)
    }
}

impl<'de> Deserialize<'de> for LeadersByCountry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(LeadersByCountryVisitor)
    }
}
