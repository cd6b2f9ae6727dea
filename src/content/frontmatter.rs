//! Front-matter parsing

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use super::date::PostDate;
use crate::error::{PostError, Result};

/// A scalar (string, number or bool) read back as its text form
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Scalar, E> {
                Ok(Scalar(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<Scalar, E> {
                Ok(Scalar(value))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Scalar, E> {
                Ok(Scalar(value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Scalar, E> {
                Ok(Scalar(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Scalar, E> {
                Ok(Scalar(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<Scalar, E> {
                Ok(Scalar(value.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Optional text that tolerates a bare number such as `title: 1984`
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|s| s.0))
}

/// Either a single string split by `split`, or a list of scalars
fn string_or_list<'de, D>(deserializer: D, split: fn(&str) -> Vec<String>) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<Scalar>),
        One(Scalar),
    }

    let items = match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::One(s)) => split(&s.0),
        Some(Raw::List(list)) => list
            .into_iter()
            .map(|s| s.0.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    };
    Ok(items)
}

fn split_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

fn split_commas(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Categories: `categories: [a, b]` or Jekyll's `categories: a b`
fn word_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    string_or_list(deserializer, split_words)
}

fn word_set<'de, D>(deserializer: D) -> Result<IndexSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(word_list(deserializer)?.into_iter().collect())
}

/// Keywords: `keywords: c++, move, rvalue` or a list
fn keyword_set<'de, D>(deserializer: D) -> Result<IndexSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(string_or_list(deserializer, split_commas)?
        .into_iter()
        .collect())
}

/// Keywords go back out in their comma-separated form unless an entry holds a comma
fn serialize_keywords<S>(keywords: &IndexSet<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if keywords.iter().any(|k| k.contains(',')) {
        keywords.serialize(serializer)
    } else {
        let joined: Vec<&str> = keywords.iter().map(String::as_str).collect();
        serializer.serialize_str(&joined.join(", "))
    }
}

/// Keys decoded into typed fields; everything else goes to `extra`
const RECOGNIZED_KEYS: [&str; 13] = [
    "layout",
    "title",
    "date",
    "desc",
    "keywords",
    "categories",
    "tags",
    "blog",
    "published",
    "excerpt_separator",
    "show_sidebar",
    "author",
    "icon",
];

fn is_true(value: &bool) -> bool {
    *value
}

/// Front-matter data from a post
///
/// Recognized keys land in typed fields; any other key is kept, in source
/// order, in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<PostDate>,
    #[serde(
        rename = "desc",
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        deserialize_with = "keyword_set",
        serialize_with = "serialize_keywords",
        skip_serializing_if = "IndexSet::is_empty"
    )]
    pub keywords: IndexSet<String>,
    #[serde(deserialize_with = "word_list", skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "word_set", skip_serializing_if = "IndexSet::is_empty")]
    pub tags: IndexSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<bool>,
    /// Posts are published unless they say otherwise
    #[serde(default = "default_published", skip_serializing_if = "is_true")]
    pub published: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_sidebar: Option<bool>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Unrecognized keys, in the order they were written.
    /// Filled by [`FrontMatter::from_value`], not by serde.
    #[serde(skip)]
    pub extra: IndexMap<String, Value>,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            layout: None,
            title: None,
            date: None,
            description: None,
            keywords: IndexSet::new(),
            categories: Vec::new(),
            tags: IndexSet::new(),
            blog: None,
            published: true,
            excerpt_separator: None,
            show_sidebar: None,
            author: None,
            icon: None,
            extra: IndexMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from a document.
    /// Returns (front_matter, body) where body is everything after the block.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let content = content.trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Err(PostError::malformed("no front-matter block"))
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str)> {
        let (opening, rest) = split_line(content);
        if opening.trim_end() != "---" {
            return Err(PostError::malformed("opening `---` must be on its own line"));
        }

        let mut offset = 0;
        let mut remaining = rest;
        loop {
            if remaining.is_empty() {
                return Err(PostError::malformed("front-matter block is not closed"));
            }
            let (line, after) = split_line(remaining);
            if line.trim_end() == "---" {
                let yaml_content = &rest[..offset];
                return Ok((Self::from_yaml(yaml_content)?, after));
            }
            offset += remaining.len() - after.len();
            remaining = after;
        }
    }

    fn from_yaml(yaml_content: &str) -> Result<Self> {
        let is_blank = yaml_content.lines().all(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || trimmed.starts_with('#')
        });
        if is_blank {
            return Ok(FrontMatter::default());
        }

        let value: Value = serde_yaml::from_str(yaml_content).map_err(PostError::malformed)?;
        Self::from_value(value)
    }

    /// Decode a parsed block: recognized keys into typed fields, the rest
    /// into `extra` untouched (tagged values included).
    pub fn from_value(value: Value) -> Result<Self> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(FrontMatter::default()),
            _ => return Err(PostError::malformed("front-matter must be a mapping")),
        };

        let mut known = Mapping::new();
        let mut extra = IndexMap::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(PostError::malformed(format!(
                        "unsupported front-matter key {:?}",
                        other
                    )))
                }
            };
            if RECOGNIZED_KEYS.contains(&key.as_str()) {
                known.insert(Value::String(key), value);
            } else {
                extra.insert(key, value);
            }
        }

        let mut fm: FrontMatter =
            serde_yaml::from_value(Value::Mapping(known)).map_err(PostError::malformed)?;
        fm.extra = extra;
        Ok(fm)
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        // Hexo style: bare JSON members terminated by `;;;`
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest
                .find(";;;")
                .ok_or_else(|| PostError::malformed("JSON front-matter is not closed"))?;
            let json_content = rest[..end_pos].trim();
            let remaining = skip_line_end(&rest[end_pos + 3..]);

            let value: Value = if json_content.starts_with('{') {
                serde_json::from_str(json_content)
            } else {
                serde_json::from_str(&format!("{{{}}}", json_content))
            }
            .map_err(PostError::malformed)?;

            return Ok((Self::from_value(value)?, remaining));
        }

        // A JSON object at the very start
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                let remaining = skip_line_end(&content[stream.byte_offset()..]);
                Ok((Self::from_value(value)?, remaining))
            }
            Some(Err(e)) => Err(PostError::malformed(e)),
            None => Err(PostError::malformed("Invalid JSON front-matter")),
        }
    }

    /// Serialize back into a `---` delimited YAML block
    pub fn to_yaml_block(&self) -> Result<String> {
        let mut value = serde_yaml::to_value(self).map_err(PostError::malformed)?;
        if let Value::Mapping(mapping) = &mut value {
            for (key, extra) in &self.extra {
                mapping.insert(Value::String(key.clone()), extra.clone());
            }
        }
        let yaml = serde_yaml::to_string(&value).map_err(PostError::malformed)?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// Split off the first line, consuming its line ending
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(pos) => (s[..pos].trim_end_matches('\r'), &s[pos + 1..]),
        None => (s, ""),
    }
}

fn skip_line_end(s: &str) -> &str {
    s.strip_prefix("\r\n")
        .or_else(|| s.strip_prefix('\n'))
        .unwrap_or(s)
}
