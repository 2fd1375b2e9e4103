// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Navigation targets: a path plus query parameters.

use std::fmt;

use url::form_urlencoded;

/// Normalizes a route path: leading `/`, no trailing `/` except for the root.
pub fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{}", trimmed)
}

/// A navigation target.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    path: String,
    query: Vec<(String, String)>,
}

impl Location {
    /// Parses `path?query`.
    pub fn parse(raw: &str) -> Self {
        let (path, query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };
        Self {
            path: normalize_path(path),
            query: form_urlencoded::parse(query.as_bytes()).into_owned().collect(),
        }
    }

    /// Creates a location without query parameters.
    pub fn path_only(path: &str) -> Self {
        Self {
            path: normalize_path(path),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the first value of a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            write!(f, "?{}", encoded)?;
        }
        Ok(())
    }
}

impl From<&str> for Location {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("rk/supply/"), "/rk/supply");
    }

    #[test]
    fn test_parse_and_display() {
        let location = Location::parse("/rk/supply?page=2&keyWord=java%20dev");
        assert_eq!(location.path(), "/rk/supply");
        assert_eq!(location.query_value("keyWord"), Some("java dev"));
        assert_eq!(location.to_string(), "/rk/supply?page=2&keyWord=java+dev");
    }

    #[test]
    fn test_nested_redirect_survives_encoding() {
        let login = Location::path_only("/login").with_query("redirect", "/rk/supply?page=2");
        let reparsed = Location::parse(&login.to_string());
        assert_eq!(reparsed.query_value("redirect"), Some("/rk/supply?page=2"));
    }
}
