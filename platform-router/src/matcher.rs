//! Path template compilation and matching.
//!
//! A template such as `/books/:id` compiles into an anchored regular
//! expression plus the ordered list of parameter names:
//!
//! | Segment      | Pattern              | Key     |
//! |--------------|----------------------|---------|
//! | `books`      | `/books`             |         |
//! | `:id`        | `/([^/]+?)`          | `id`    |
//! | `:id?`       | `(?:/([^/]+?))?`     | `id`    |
//! | `:file.pdf`  | `/([^/]+?)\.pdf`     | `file`  |
//! | `*`          | `/(.*)`              | `wild`  |
//!
//! Matching is whole-path, case-insensitive, and tolerates a trailing slash.
//! Any `?query` suffix on the template is ignored.

use regex::{Regex, RegexBuilder};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::RouterResult;

/// Key used for `*` wildcard segments.
pub const WILDCARD_KEY: &str = "wild";

/// Parameters extracted from a matched path, in template order.
///
/// A value is `None` when its capture group did not participate in the
/// match (an omitted optional segment).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, Option<String>)>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, replacing an earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Value of a parameter, if it was captured.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

impl Serialize for PathParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param {
        name: String,
        optional: bool,
        suffix: Option<String>,
    },
    Wildcard,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw.starts_with('*') {
            return Self::Wildcard;
        }
        let Some(body) = raw.strip_prefix(':') else {
            return Self::Literal(raw.to_string());
        };

        let optional_at = body.find('?');
        let suffix_at = body.find('.');
        let name_end = optional_at.or(suffix_at).unwrap_or(body.len());
        Self::Param {
            name: body[..name_end].to_string(),
            optional: optional_at.is_some(),
            suffix: suffix_at.map(|at| body[at..].to_string()),
        }
    }

    fn write_pattern(&self, pattern: &mut String) {
        match self {
            Self::Literal(text) => {
                pattern.push('/');
                pattern.push_str(&regex::escape(text));
            }
            Self::Param {
                optional, suffix, ..
            } => match suffix {
                None if *optional => pattern.push_str("(?:/([^/]+?))?"),
                None => pattern.push_str("/([^/]+?)"),
                Some(suffix) => {
                    pattern.push_str("/([^/]+?)");
                    if *optional {
                        pattern.push('?');
                    }
                    pattern.push_str(&regex::escape(suffix));
                }
            },
            Self::Wildcard => pattern.push_str("/(.*)"),
        }
    }

    fn key(&self) -> Option<&str> {
        match self {
            Self::Literal(_) => None,
            Self::Param { name, .. } => Some(name),
            Self::Wildcard => Some(WILDCARD_KEY),
        }
    }

    fn is_plain_param(&self) -> bool {
        matches!(
            self,
            Self::Param {
                optional: false,
                suffix: None,
                ..
            }
        )
    }
}

/// Strip a `?query` suffix from a concrete path.
pub fn strip_query(path: &str) -> &str {
    path.split_once('?').map_or(path, |(p, _)| p)
}

/// Strip a `?query` suffix from a template.
///
/// A `?` closing a parameter name (`/:id?`, `/:id?/x`, `/:id?.pdf`) marks an
/// optional segment and is kept.
pub fn strip_template_query(template: &str) -> &str {
    let bytes = template.as_bytes();
    let mut in_param = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'/' => in_param = false,
            b':' if i == 0 || bytes[i - 1] == b'/' => in_param = true,
            b'?' => {
                let optional_marker =
                    in_param && matches!(bytes.get(i + 1), None | Some(b'/') | Some(b'.'));
                if !optional_marker {
                    return &template[..i];
                }
            }
            _ => {}
        }
    }
    template
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    segments: Vec<Segment>,
    keys: Vec<String>,
    regex: Regex,
}

impl PathPattern {
    /// Compile a template.
    ///
    /// # Example
    /// ```rust,ignore
    /// let pattern = PathPattern::compile("/books/:id")?;
    /// assert_eq!(pattern.captures("/books/1234").unwrap().get("id"), Some("1234"));
    /// ```
    pub fn compile(template: &str) -> RouterResult<Self> {
        let segments: Vec<Segment> = strip_template_query(template)
            .split('/')
            .filter(|s| !s.is_empty())
            .map(Segment::parse)
            .collect();

        let mut pattern = String::from("^");
        for segment in &segments {
            segment.write_pattern(&mut pattern);
        }
        pattern.push_str("/?$");

        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        let keys = segments
            .iter()
            .filter_map(|s| s.key().map(str::to_string))
            .collect();

        Ok(Self {
            template: template.to_string(),
            segments,
            keys,
            regex,
        })
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameter names in template order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether `path` matches the whole template. A `?query` suffix on
    /// `path` is ignored.
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(strip_query(path))
    }

    /// Match `path` and extract its parameters.
    ///
    /// Returns `None` when the path does not match. Returns empty params when
    /// the template declares no parameters.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(strip_query(path))?;
        let mut params = PathParams::new();
        for (i, key) in self.keys.iter().enumerate() {
            let value = caps.get(i + 1).map(|m| m.as_str().to_string());
            params.insert(key.clone(), value);
        }
        Some(params)
    }

    /// Whether both templates match exactly the same set of paths.
    ///
    /// Only fixed-shape templates are compared: same segment count, with
    /// every position either an equal literal or a plain parameter on both
    /// sides. Optional, suffixed and wildcard segments never conflict here.
    pub fn conflicts_with(&self, other: &PathPattern) -> bool {
        if self.segments.len() != other.segments.len() {
            return false;
        }
        self.segments
            .iter()
            .zip(&other.segments)
            .all(|(a, b)| match (a, b) {
                (Segment::Literal(x), Segment::Literal(y)) => x.eq_ignore_ascii_case(y),
                _ => a.is_plain_param() && b.is_plain_param(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_template() {
        let pattern = PathPattern::compile("/help/about").unwrap();
        assert!(pattern.is_match("/help/about"));
        assert!(pattern.is_match("/help/about/"));
        assert!(pattern.is_match("/HELP/About"));
        assert!(!pattern.is_match("/help/about/more"));
        assert!(!pattern.is_match("/x/help/about"));
        assert!(pattern.keys().is_empty());
        assert_eq!(pattern.captures("/help/about"), Some(PathParams::new()));
    }

    #[test]
    fn test_single_param() {
        let pattern = PathPattern::compile("/books/:id").unwrap();
        let params = pattern.captures("/books/1234").unwrap();
        assert_eq!(params.get("id"), Some("1234"));
        assert!(!pattern.is_match("/books"));
        assert!(!pattern.is_match("/books/1/2"));
    }

    #[test]
    fn test_query_is_ignored() {
        let pattern = PathPattern::compile("/books/:id?view=full").unwrap();
        assert_eq!(pattern.keys(), &["id".to_string()]);
        assert!(pattern.is_match("/books/12?foo=bar"));
    }

    #[test]
    fn test_strip_template_query() {
        assert_eq!(strip_template_query("/books/:id?view=full"), "/books/:id");
        assert_eq!(strip_template_query("/books?view=full"), "/books");
        assert_eq!(strip_template_query("/clients/:id?"), "/clients/:id?");
        assert_eq!(strip_template_query("/clients/:id?/edit"), "/clients/:id?/edit");
        assert_eq!(strip_template_query("/docs/:file?.pdf"), "/docs/:file?.pdf");
    }

    #[test]
    fn test_optional_param_is_tolerant() {
        let pattern = PathPattern::compile("/clients/:id?").unwrap();
        assert_eq!(pattern.captures("/clients/7").unwrap().get("id"), Some("7"));

        let params = pattern.captures("/clients").unwrap();
        assert!(params.contains_key("id"));
        assert_eq!(params.get("id"), None);
    }

    #[test]
    fn test_suffix_and_wildcard() {
        let pattern = PathPattern::compile("/docs/:file.pdf").unwrap();
        assert_eq!(
            pattern.captures("/docs/statement.pdf").unwrap().get("file"),
            Some("statement")
        );
        assert!(!pattern.is_match("/docs/statement.txt"));

        let pattern = PathPattern::compile("/assets/*").unwrap();
        assert_eq!(
            pattern.captures("/assets/img/logo.png").unwrap().get(WILDCARD_KEY),
            Some("img/logo.png")
        );
    }

    #[test]
    fn test_params_in_template_order() {
        let pattern = PathPattern::compile("/clients/:client/accounts/:account").unwrap();
        let params = pattern.captures("/clients/9/accounts/ab").unwrap();
        let keys: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["client", "account"]);
    }

    #[test]
    fn test_literals_are_escaped() {
        let pattern = PathPattern::compile("/a+b/(x)").unwrap();
        assert!(pattern.is_match("/a+b/(x)"));
        assert!(!pattern.is_match("/aab/x"));
    }

    #[test]
    fn test_conflicts() {
        let a = PathPattern::compile("/items/:id").unwrap();
        let b = PathPattern::compile("/items/:slug").unwrap();
        let c = PathPattern::compile("/items/special").unwrap();
        let d = PathPattern::compile("/items/:id?").unwrap();
        assert!(a.conflicts_with(&b));
        assert!(!a.conflicts_with(&c));
        assert!(!a.conflicts_with(&d));
        assert!(c.conflicts_with(&PathPattern::compile("/Items/Special").unwrap()));
    }

    #[test]
    fn test_params_serialize_as_map() {
        let pattern = PathPattern::compile("/clients/:id/:tab?").unwrap();
        let params = pattern.captures("/clients/5").unwrap();
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            serde_json::json!({ "id": "5", "tab": null })
        );
    }
}
