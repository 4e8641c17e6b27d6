use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::core::DataValue;

/// Field binding evaluated against each data item.
pub struct ValueAccessor<T> {
    read: Rc<dyn Fn(&T) -> DataValue>,
}

impl<T> Clone for ValueAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            read: Rc::clone(&self.read),
        }
    }
}

impl<T> fmt::Debug for ValueAccessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueAccessor(..)")
    }
}

impl<T> ValueAccessor<T> {
    pub fn new<V, F>(read: F) -> Self
    where
        V: Into<DataValue>,
        F: Fn(&T) -> V + 'static,
    {
        Self {
            read: Rc::new(move |item| read(item).into()),
        }
    }

    #[must_use]
    pub fn raw(&self, item: &T) -> DataValue {
        (self.read)(item)
    }

    /// Numeric reading; NaN when the field is missing or not numeric.
    #[must_use]
    pub fn value(&self, item: &T) -> f64 {
        self.raw(item).to_f64()
    }

    #[must_use]
    pub fn label(&self, item: &T) -> String {
        self.raw(item).to_label()
    }
}

impl ValueAccessor<Value> {
    /// Reads a field of JSON items.
    ///
    /// `path` is either a JSON pointer (`/series/0/close`) or a dotted path
    /// (`series.0.close`); numeric segments index arrays.
    #[must_use]
    pub fn json_path(path: &str) -> Self {
        let pointer = to_json_pointer(path);
        Self {
            read: Rc::new(move |item: &Value| match item.pointer(&pointer) {
                Some(Value::Number(number)) => {
                    number.as_f64().map_or(DataValue::Missing, DataValue::Number)
                }
                Some(Value::String(text)) => DataValue::Text(text.clone()),
                Some(Value::Bool(_) | Value::Null | Value::Array(_) | Value::Object(_)) | None => {
                    DataValue::Missing
                }
            }),
        }
    }
}

fn to_json_pointer(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        return path.to_owned();
    }
    path.split('.')
        .map(|segment| segment.replace('~', "~0").replace('/', "~1"))
        .fold(String::new(), |mut pointer, segment| {
            pointer.push('/');
            pointer.push_str(&segment);
            pointer
        })
}
