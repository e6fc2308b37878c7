//! Flattening of parameter objects into string key/value pairs.
//!
//! Resource types describe themselves with a static table of [`Field`]s
//! (key, presence rule, accessor). [`serialize_fields`] walks that table to
//! produce a [`ParamMap`], which is what both the query string and the
//! form body are encoded from.

use std::collections::{BTreeMap, HashMap};
use url::form_urlencoded;

/// Flat parameter mapping. Ordered, so encoded output is stable.
pub type ParamMap = BTreeMap<String, String>;

/// A single field value before it is turned into a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl ParamValue {
    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            ParamValue::Str(s) => s.is_empty(),
            ParamValue::Int(n) => *n == 0,
            ParamValue::Bool(b) => !*b,
        }
    }

    /// Render the value the way the API expects it on the wire
    pub fn into_param_string(self) -> String {
        match self {
            ParamValue::Str(s) => s,
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::Str(s.clone())
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Int(n)
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        ParamValue::Int(n as i64)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// When a field is put into the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Sent even when it holds the zero value, so callers can clear a setting
    Always,
    /// Left out when it holds the zero value
    OmitEmpty,
}

/// One row of a declarative field table.
pub struct Field<T> {
    pub key: &'static str,
    pub presence: Presence,
    pub get: fn(&T) -> ParamValue,
}

/// Anything that can be flattened into request parameters.
pub trait ToParams {
    fn to_params(&self) -> ParamMap;
}

/// Walk a field table over `value` and collect the resulting pairs.
pub fn serialize_fields<T>(value: &T, fields: &[Field<T>]) -> ParamMap {
    let mut params = ParamMap::new();
    for field in fields {
        let v = (field.get)(value);
        if field.presence == Presence::OmitEmpty && v.is_zero() {
            continue;
        }
        params.insert(field.key.to_string(), v.into_param_string());
    }
    params
}

/// Lay caller-supplied raw pairs over structured ones. Raw values win.
pub fn merge_overrides<'a, I>(mut params: ParamMap, overrides: I) -> ParamMap
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    for (k, v) in overrides {
        params.insert(k.clone(), v.clone());
    }
    params
}

/// Form-encode a parameter map (`a=1&b=x+y`), keys in sorted order.
pub fn encode(params: &ParamMap) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

impl ToParams for ParamMap {
    fn to_params(&self) -> ParamMap {
        self.clone()
    }
}

impl ToParams for HashMap<String, String> {
    fn to_params(&self) -> ParamMap {
        merge_overrides(ParamMap::new(), self)
    }
}

impl ToParams for [(&str, &str)] {
    fn to_params(&self) -> ParamMap {
        self.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

impl<const N: usize> ToParams for [(&str, &str); N] {
    fn to_params(&self) -> ParamMap {
        self.as_slice().to_params()
    }
}

impl ToParams for () {
    fn to_params(&self) -> ParamMap {
        ParamMap::new()
    }
}

impl<T: ToParams + ?Sized> ToParams for &T {
    fn to_params(&self) -> ParamMap {
        (**self).to_params()
    }
}
