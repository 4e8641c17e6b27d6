use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Raw field value pulled out of a data item by an accessor.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    Number(f64),
    Decimal(Decimal),
    Time(DateTime<Utc>),
    Text(String),
    Missing,
}

impl DataValue {
    /// Coerces the value into axis input.
    ///
    /// Anything that has no numeric reading (missing fields, non-numeric
    /// text, decimals outside the `f64` range) becomes NaN so renderers skip
    /// the item instead of failing the traversal.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Decimal(value) => decimal_to_f64(*value, "value").unwrap_or(f64::NAN),
            Self::Time(time) => datetime_to_unix_seconds(*time),
            Self::Text(text) => text.trim().parse::<f64>().unwrap_or(f64::NAN),
            Self::Missing => f64::NAN,
        }
    }

    /// Text used when the value labels a category.
    #[must_use]
    pub fn to_label(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Decimal(value) => value.normalize().to_string(),
            Self::Time(time) => time.to_rfc3339(),
            Self::Text(text) => text.clone(),
            Self::Missing => String::new(),
        }
    }

    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<Decimal> for DataValue {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Time(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<V: Into<DataValue>> From<Option<V>> for DataValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}
