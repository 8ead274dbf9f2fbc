//! Parameter containers accepted by the signature computer.
//!
//! Twilio signs every value of every parameter, so a container only needs
//! to answer two questions: which names it holds, and all values for a name.
//! Adapters cover plain maps, multi-value maps, parsed form pairs and JSON
//! objects.

use std::borrow::{Borrow, Cow};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::{Map, Value};

/// A source of request parameters.
pub trait ParamSource {
    /// Parameter names. Duplicates are allowed.
    fn names(&self) -> Vec<&str>;

    /// All values for `name`, in any order.
    fn values(&self, name: &str) -> Vec<Cow<'_, str>>;
}

/// The value side of a map entry: one value or several.
pub trait ParamValues {
    /// The values held.
    fn param_values(&self) -> Vec<Cow<'_, str>>;
}

impl ParamValues for String {
    fn param_values(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.as_str())]
    }
}

impl ParamValues for &str {
    fn param_values(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(*self)]
    }
}

impl<T: ParamValues> ParamValues for Vec<T> {
    fn param_values(&self) -> Vec<Cow<'_, str>> {
        self.iter().flat_map(ParamValues::param_values).collect()
    }
}

impl ParamValues for Value {
    fn param_values(&self) -> Vec<Cow<'_, str>> {
        match self {
            Value::Null => Vec::new(),
            Value::String(s) => vec![Cow::Borrowed(s.as_str())],
            Value::Array(items) => items.iter().flat_map(ParamValues::param_values).collect(),
            other => vec![Cow::Owned(other.to_string())],
        }
    }
}

impl<K, V, S> ParamSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: ParamValues,
    S: BuildHasher,
{
    fn names(&self) -> Vec<&str> {
        self.keys().map(Borrow::<str>::borrow).collect()
    }

    fn values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.get(name).map(ParamValues::param_values).unwrap_or_default()
    }
}

impl<K, V> ParamSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: ParamValues,
{
    fn names(&self) -> Vec<&str> {
        self.keys().map(Borrow::<str>::borrow).collect()
    }

    fn values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.get(name).map(ParamValues::param_values).unwrap_or_default()
    }
}

impl ParamSource for Map<String, Value> {
    fn names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn values(&self, name: &str) -> Vec<Cow<'_, str>> {
        self.get(name).map(ParamValues::param_values).unwrap_or_default()
    }
}

fn pair_names<K: AsRef<str>, V>(pairs: &[(K, V)]) -> Vec<&str> {
    pairs.iter().map(|(k, _)| k.as_ref()).collect()
}

fn pair_values<'a, K: AsRef<str>, V: AsRef<str>>(
    pairs: &'a [(K, V)],
    name: &str,
) -> Vec<Cow<'a, str>> {
    pairs
        .iter()
        .filter(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| Cow::Borrowed(v.as_ref()))
        .collect()
}

/// Ordered `(name, value)` pairs, as produced by form parsing.
impl<K: AsRef<str>, V: AsRef<str>> ParamSource for Vec<(K, V)> {
    fn names(&self) -> Vec<&str> {
        pair_names(self)
    }

    fn values(&self, name: &str) -> Vec<Cow<'_, str>> {
        pair_values(self, name)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> ParamSource for &[(K, V)] {
    fn names(&self) -> Vec<&str> {
        pair_names(self)
    }

    fn values(&self, name: &str) -> Vec<Cow<'_, str>> {
        pair_values(self, name)
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> ParamSource for [(K, V); N] {
    fn names(&self) -> Vec<&str> {
        pair_names(self)
    }

    fn values(&self, name: &str) -> Vec<Cow<'_, str>> {
        pair_values(self, name)
    }
}
