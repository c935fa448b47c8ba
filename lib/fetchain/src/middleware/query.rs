//! Query-string editing.
//!
//! By default every listed key first loses the values already in the URL,
//! then all listed values are appended in order, so a key listed twice keeps
//! both. List values expand to repeated keys:
//!
//! ```ignore
//! let params = Query::new().param("hello", ["a", "b"]).param("world", "2022");
//! api.at("/search", chain![query(params)]).await?;
//! // -> /search?hello=a&hello=b&world=2022
//! ```

use std::collections::HashSet;

use serde::Serialize;
use url::Url;

use crate::{Error, Middleware, Result, from_fn};

/// Value bound to one query key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value.
    Value(String),
    /// Repeated key, one entry per element.
    List(Vec<String>),
    /// Explicit null, emitted only with [`QueryOptions::include_null`].
    Null,
    /// Unset value, emitted only with [`QueryOptions::include_undefined`].
    Undefined,
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

macro_rules! query_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    Self::Value(value.to_string())
                }
            }
        )*
    };
}

query_value_from_display!(bool, i32, i64, u16, u32, u64, usize, f64);

impl<T: Into<String>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<String>, const N: usize> From<[T; N]> for QueryValue {
    fn from(values: [T; N]) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl QueryValue {
    fn from_json(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::String(s) => Self::Value(s),
            Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(s) => s,
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            other => Self::Value(other.to_string()),
        }
    }
}

/// How [`query_with`] edits the URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Keep existing values of a key instead of replacing them.
    pub append: bool,
    /// Emit [`QueryValue::Undefined`] as `key=`.
    pub include_undefined: bool,
    /// Emit [`QueryValue::Null`] as `key=`.
    pub include_null: bool,
}

impl QueryOptions {
    /// Options with `append` set.
    #[must_use]
    pub const fn append() -> Self {
        Self {
            append: true,
            include_undefined: false,
            include_null: false,
        }
    }
}

/// Ordered query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, QueryValue)>,
}

impl Query {
    /// Empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Parameters from a serializable struct or map, in field order.
    ///
    /// `None` fields become [`QueryValue::Null`]; sequences become lists.
    ///
    /// # Errors
    ///
    /// Fails when the value does not serialize to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            serde_json::Value::Object(fields) => Ok(Self {
                params: fields
                    .into_iter()
                    .map(|(name, value)| (name, QueryValue::from_json(value)))
                    .collect(),
            }),
            other => Err(Error::middleware(format!(
                "query parameters must be an object, got {other}"
            ))),
        }
    }

    /// Parameters in insertion order.
    #[must_use]
    pub fn params(&self) -> &[(String, QueryValue)] {
        &self.params
    }

    /// Apply to `url`.
    pub fn apply(&self, url: &mut Url, options: QueryOptions) {
        let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        if !options.append {
            let listed: HashSet<&str> =
                self.params.iter().map(|(name, _)| name.as_str()).collect();
            pairs.retain(|(key, _)| !listed.contains(key.as_str()));
        }

        for (name, value) in &self.params {
            match value {
                QueryValue::Value(value) => pairs.push((name.clone(), value.clone())),
                QueryValue::List(values) => {
                    pairs.extend(values.iter().map(|value| (name.clone(), value.clone())));
                }
                QueryValue::Null if options.include_null => {
                    pairs.push((name.clone(), String::new()));
                }
                QueryValue::Undefined if options.include_undefined => {
                    pairs.push((name.clone(), String::new()));
                }
                QueryValue::Null | QueryValue::Undefined => {}
            }
        }

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(params: [(K, V); N]) -> Self {
        params.into_iter().collect()
    }
}

impl<K, V> From<Vec<(K, V)>> for Query
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from(params: Vec<(K, V)>) -> Self {
        params.into_iter().collect()
    }
}

/// Replace the listed keys in the query string.
pub fn query(params: impl Into<Query>) -> impl Middleware {
    query_with(params, QueryOptions::default())
}

/// Edit the query string according to `options`.
pub fn query_with(params: impl Into<Query>, options: QueryOptions) -> impl Middleware {
    let params = params.into();
    from_fn(move |ctx, next| {
        params.apply(ctx.url_mut(), options);
        next.run(ctx)
    })
}
