use std::collections::BTreeMap;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One guidance item in the canonical field shape. Source documents spell
/// these fields inconsistently, so the struct accepts the observed variants
/// via serde aliases and treats every field except the title as optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuideRecord {
    #[serde(default, alias = "Title", alias = "name", alias = "Name")]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "Washing_Steps",
        alias = "washing_steps",
        deserialize_with = "string_or_seq"
    )]
    pub steps: Vec<String>,
    #[serde(default, alias = "tip", deserialize_with = "string_or_seq")]
    pub tips: Vec<String>,
    #[serde(
        default,
        alias = "not_to_do",
        alias = "Not_to__do",
        deserialize_with = "string_or_seq"
    )]
    pub avoid: Vec<String>,
    #[serde(
        default,
        alias = "Other_Information",
        alias = "other_information",
        deserialize_with = "string_or_seq"
    )]
    pub notes: Vec<String>,
    #[serde(default, deserialize_with = "string_or_seq")]
    pub aliases: Vec<String>,
    #[serde(default, alias = "tags", deserialize_with = "string_or_seq")]
    pub keywords: Vec<String>,
}

impl GuideRecord {
    pub fn titled(title: &str) -> GuideRecord {
        GuideRecord {
            title: Some(title.to_string()),
            ..GuideRecord::default()
        }
    }

    /// Every string a fuzzy query may be compared against.
    pub fn candidate_strings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(title) = &self.title {
            out.push(title.as_str());
        }
        out.extend(self.aliases.iter().map(String::as_str));
        out.extend(self.keywords.iter().map(String::as_str));
        out
    }
}

/// Field keys that mark a JSON object as a guide record rather than a
/// category map.
const RECORD_KEYS: &[&str] = &[
    "title",
    "Title",
    "name",
    "Name",
    "description",
    "steps",
    "Washing_Steps",
    "washing_steps",
    "tip",
    "tips",
    "not_to_do",
    "Not_to__do",
    "avoid",
    "Other_Information",
    "other_information",
    "notes",
    "aliases",
    "keywords",
    "tags",
];

/// The shapes guide documents actually arrive in. A bare string is a
/// title-only entry, a list nests more sources, a map groups sources under
/// category names. Anything else is opaque and flattens to nothing.
#[derive(Debug, Clone)]
pub enum GuideSource {
    Text(String),
    Record(GuideRecord),
    List(Vec<GuideSource>),
    Categories(BTreeMap<String, GuideSource>),
    Opaque,
}

impl GuideSource {
    pub fn from_json_str(json: &str) -> serde_json::Result<GuideSource> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(value))
    }

    /// Classify a JSON value by shape. Objects carrying any known record
    /// field become records; other objects are category maps.
    pub fn from_value(value: Value) -> GuideSource {
        match value {
            Value::String(text) => GuideSource::Text(text),
            Value::Array(items) => {
                GuideSource::List(items.into_iter().map(Self::from_value).collect())
            }
            Value::Object(map) => {
                let looks_like_record = map.keys().any(|k| RECORD_KEYS.contains(&k.as_str()));
                if looks_like_record {
                    match serde_json::from_value(Value::Object(map)) {
                        Ok(record) => GuideSource::Record(record),
                        Err(err) => {
                            log::debug!("unparsable guide record skipped: {}", err);
                            GuideSource::Opaque
                        }
                    }
                } else {
                    GuideSource::Categories(
                        map.into_iter()
                            .map(|(key, sub)| (key, Self::from_value(sub)))
                            .collect(),
                    )
                }
            }
            _ => GuideSource::Opaque,
        }
    }

    /// Produce the uniform record list. Category keys become the title of
    /// any child record that carries none.
    pub fn flatten(&self) -> Vec<GuideRecord> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<GuideRecord>) {
        match self {
            GuideSource::Text(text) => out.push(GuideRecord::titled(text)),
            GuideSource::Record(record) => out.push(record.clone()),
            GuideSource::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
            GuideSource::Categories(map) => {
                for (key, sub) in map {
                    let mut children = sub.flatten();
                    for child in &mut children {
                        if child.title.is_none() {
                            child.title = Some(key.clone());
                        }
                    }
                    out.extend(children);
                }
            }
            GuideSource::Opaque => {}
        }
    }
}

/// Accepts a lone string, a string array, or null where a list is expected.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrSeq;

    impl<'de> Visitor<'de> for StringOrSeq {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string, a list of strings, or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                out.push(item);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(StringOrSeq)
}
