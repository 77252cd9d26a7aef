//! Cell values held by a [`Table`](crate::Table).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single table cell.
///
/// `Null` is the missing-value marker; every fill and arithmetic rule in the
/// workspace keys off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Free text.
    Text(String),
    /// Calendar date.
    Date(NaiveDate),
}

/// Hashable form of a value used to match join keys.
///
/// Integral floats collapse onto `Int` so that `1` and `1.0` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JoinKey {
    /// Boolean key.
    Bool(bool),
    /// Integer key.
    Int(i64),
    /// Non-integral float key, by bit pattern.
    Float(u64),
    /// Text key.
    Text(String),
    /// Date key.
    Date(NaiveDate),
}

impl Value {
    /// Returns true for the missing-value marker.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the value, if it has one.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Date(_) => "date",
        }
    }

    /// Key used for equality joins. `Null` never matches anything.
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn join_key(&self) -> Option<JoinKey> {
        match self {
            Self::Null => None,
            Self::Bool(b) => Some(JoinKey::Bool(*b)),
            Self::Int(i) => Some(JoinKey::Int(*i)),
            Self::Float(f) if f.is_nan() => None,
            Self::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => {
                Some(JoinKey::Int(*f as i64))
            }
            Self::Float(f) => Some(JoinKey::Float(f.to_bits())),
            Self::Text(s) => Some(JoinKey::Text(s.clone())),
            Self::Date(d) => Some(JoinKey::Date(*d)),
        }
    }

    /// Converts a JSON scalar into a cell. Nested arrays and objects are kept
    /// as their JSON text.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            serde_json::Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }

    /// Infers a cell from its CSV text. Empty text and any spelling of
    /// `NaN` are `Null`.
    pub fn infer(field: &str) -> Self {
        if field.is_empty() {
            return Self::Null;
        }
        if let Ok(i) = field.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = field.parse::<f64>() {
            return if f.is_nan() { Self::Null } else { Self::Float(f) };
        }
        match field {
            "true" | "True" => Self::Bool(true),
            "false" | "False" => Self::Bool(false),
            _ => Self::Text(field.to_string()),
        }
    }

    /// CSV text for the cell. Floats always carry a decimal point or
    /// exponent so that they read back as floats.
    pub fn to_field(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => format!("{f:?}"),
            Self::Text(s) => s.clone(),
            Self::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric addition. `Null` on either side yields `Null`.
    #[allow(clippy::should_implement_trait)]
    pub fn add(&self, other: &Self, column: &str) -> crate::Result<Self> {
        self.arith(other, column, "+", i64::checked_add, |a, b| a + b)
    }

    /// Numeric multiplication. `Null` on either side yields `Null`.
    #[allow(clippy::should_implement_trait)]
    pub fn mul(&self, other: &Self, column: &str) -> crate::Result<Self> {
        self.arith(other, column, "*", i64::checked_mul, |a, b| a * b)
    }

    fn arith(
        &self,
        other: &Self,
        column: &str,
        op: &str,
        int_op: fn(i64, i64) -> Option<i64>,
        float_op: fn(f64, f64) -> f64,
    ) -> crate::Result<Self> {
        match (self, other) {
            (Self::Null, _) | (_, Self::Null) => Ok(Self::Null),
            (Self::Int(a), Self::Int(b)) => Ok(int_op(*a, *b).map_or_else(
                || Self::Float(float_op(*a as f64, *b as f64)),
                Self::Int,
            )),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Ok(Self::Float(float_op(x, y))),
                _ => Err(crate::TsPrepError::type_mismatch(
                    column,
                    format!("cannot apply '{op}' to {} and {}", a.kind(), b.kind()),
                )),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NaN"),
            other => write!(f, "{}", other.to_field()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_field_kinds() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("42"), Value::Int(42));
        assert_eq!(Value::infer("-3.5"), Value::Float(-3.5));
        assert_eq!(Value::infer("3.0"), Value::Float(3.0));
        assert_eq!(Value::infer("True"), Value::Bool(true));
        assert_eq!(
            Value::infer("Tue, 01 Jan 2013 00:00:00 GMT"),
            Value::Text("Tue, 01 Jan 2013 00:00:00 GMT".to_string())
        );
    }

    #[test]
    fn test_nan_fields_read_as_null() {
        for field in ["NaN", "nan", "-NaN"] {
            assert_eq!(Value::infer(field), Value::Null, "field {field}");
        }
        assert_eq!(Value::infer(&Value::Float(f64::NAN).to_field()), Value::Null);
        assert_eq!(Value::infer("inf"), Value::Float(f64::INFINITY));
    }

    #[test]
    fn test_float_field_reads_back_as_float() {
        for f in [3.0, 7.5, -0.25, 1.0e-7, 123_456_789.0] {
            let field = Value::Float(f).to_field();
            assert_eq!(Value::infer(&field), Value::Float(f), "field {field}");
        }
    }

    #[test]
    fn test_from_json_scalars() {
        let json = serde_json::json!([null, true, 7, 2.5, "x", [1, 2]]);
        let cells: Vec<Value> = json
            .as_array()
            .unwrap()
            .iter()
            .map(Value::from_json)
            .collect();

        assert_eq!(
            cells,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::Int(7),
                Value::Float(2.5),
                Value::Text("x".to_string()),
                Value::Text("[1,2]".to_string()),
            ]
        );
    }

    #[test]
    fn test_arithmetic_rules() {
        let total = Value::Int(3).mul(&Value::Float(2.5), "sales_total").unwrap();
        assert_eq!(total, Value::Float(7.5));

        let sum = Value::Int(2).add(&Value::Int(3), "wind_solar").unwrap();
        assert_eq!(sum, Value::Int(5));

        let missing = Value::Null.add(&Value::Int(3), "wind_solar").unwrap();
        assert!(missing.is_null());

        let err = Value::from("a").mul(&Value::Int(1), "sales_total").unwrap_err();
        assert!(err.to_string().contains("sales_total"));
    }

    #[test]
    fn test_join_key_matches_integral_float() {
        assert_eq!(Value::Int(1).join_key(), Value::Float(1.0).join_key());
        assert_ne!(Value::Int(1).join_key(), Value::from("1").join_key());
        assert!(Value::Null.join_key().is_none());
        assert!(Value::Float(f64::NAN).join_key().is_none());
    }
}
