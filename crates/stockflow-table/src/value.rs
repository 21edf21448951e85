use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A single cell in a [`crate::Table`].
///
/// `Integer` and `Number` are both numeric. Floats are wrapped in [`OrderedFloat`] so values can
/// be used directly as hash-map keys when joining and grouping.
///
/// Equality and hashing follow numeric value rather than representation: `Integer(1)` and
/// `Number(1.0)` are the same key. A `NaN` number is a missing value, equal to `Null`.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Number(OrderedFloat<f64>),
    Text(Arc<str>),
    Date(NaiveDate),
}

/// Representation-independent form of a [`Value`], used for equality and hashing.
#[derive(PartialEq, Eq, Hash)]
enum Canonical<'a> {
    Null,
    Integer(i64),
    Number(OrderedFloat<f64>),
    Text(&'a str),
    Date(NaiveDate),
}

impl Value {
    /// True for `Null` and for a `NaN` number.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Number(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Number(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Number(v) if !v.is_nan() => Some(v.0),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Short type label used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Date(_) => "date",
        }
    }

    /// Compare two values of compatible types.
    ///
    /// Numeric values compare across `Integer`/`Number`. Returns `None` for nulls and for
    /// mismatched types (text vs number, etc).
    pub fn partial_cmp_value(&self, other: &Value) -> Option<Ordering> {
        match (self.canonical(), other.canonical()) {
            (Canonical::Integer(a), Canonical::Integer(b)) => Some(a.cmp(&b)),
            (Canonical::Number(a), Canonical::Number(b)) => Some(a.cmp(&b)),
            // A canonical `Number` is never integral, so these can't compare `Equal`.
            (Canonical::Integer(a), Canonical::Number(b)) => (a as f64).partial_cmp(&b.0),
            (Canonical::Number(a), Canonical::Integer(b)) => a.0.partial_cmp(&(b as f64)),
            (Canonical::Text(a), Canonical::Text(b)) => Some(a.cmp(b)),
            (Canonical::Date(a), Canonical::Date(b)) => Some(a.cmp(&b)),
            _ => None,
        }
    }

    /// Integral floats inside the `i64` range fold to `Integer`; `NaN` folds to `Null`.
    fn canonical(&self) -> Canonical<'_> {
        match self {
            Value::Null => Canonical::Null,
            Value::Integer(v) => Canonical::Integer(*v),
            Value::Number(v) if v.is_nan() => Canonical::Null,
            Value::Number(v) => match integral_f64(v.0) {
                Some(i) => Canonical::Integer(i),
                None => Canonical::Number(*v),
            },
            Value::Text(s) => Canonical::Text(s.as_ref()),
            Value::Date(d) => Canonical::Date(*d),
        }
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as i64)
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NaN"),
            Value::Integer(v) => write!(f, "{v}"),
            Value::Number(v) => write!(f, "{}", v.0),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Integer(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(OrderedFloat(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(Arc::from(value))
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_values_compare_across_representations() {
        assert_eq!(
            Value::from(3).partial_cmp_value(&Value::from(2.5)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            Value::from(-1.0).partial_cmp_value(&Value::from(0)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn nulls_and_mismatched_types_are_incomparable() {
        assert_eq!(Value::Null.partial_cmp_value(&Value::from(1)), None);
        assert_eq!(Value::from("WH1").partial_cmp_value(&Value::from(1)), None);
    }

    fn hash_of(value: &Value) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn integral_numbers_equal_integers_as_keys() {
        assert_eq!(Value::from(1), Value::from(1.0));
        assert_eq!(hash_of(&Value::from(1)), hash_of(&Value::from(1.0)));
        assert_eq!(Value::from(0), Value::from(-0.0));
        assert_eq!(hash_of(&Value::from(0)), hash_of(&Value::from(-0.0)));
        assert_ne!(Value::from(1), Value::from(1.5));
        assert_ne!(Value::from(1), Value::from("1"));
        assert_eq!(
            Value::from(1).partial_cmp_value(&Value::from(1.0)),
            Some(Ordering::Equal)
        );
        assert_eq!(
            Value::from(2).partial_cmp_value(&Value::from(1.5)),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn nan_is_missing() {
        let nan = Value::from(f64::NAN);
        assert!(nan.is_null());
        assert_eq!(nan, Value::Null);
        assert_eq!(hash_of(&nan), hash_of(&Value::Null));
        assert_eq!(nan.as_f64(), None);
        assert_eq!(nan.partial_cmp_value(&Value::from(0)), None);
        assert!(!Value::from(f64::INFINITY).is_null());
    }

    #[test]
    fn display_matches_console_conventions() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(Value::from(date).to_string(), "2025-01-03");
        assert_eq!(Value::from(-40).to_string(), "-40");
        assert_eq!(Value::Null.to_string(), "NaN");
    }
}
