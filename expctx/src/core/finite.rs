//! Rejects non-finite floats before arguments are encoded.
//!
//! JSON has no representation for `NaN` or infinities and `serde_json`
//! silently writes them as `null`, which would not decode back to the value
//! that was passed in. [`check_finite`] walks the value with a serializer
//! that produces nothing and fails on the first such float, naming its path.

use serde::ser::{self, Serialize};
use std::fmt;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub(crate) struct FiniteError(String);

impl ser::Error for FiniteError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self(msg.to_string())
    }
}

/// Returns an error if `value` contains a `NaN` or infinite float.
pub(crate) fn check_finite<T>(value: &T) -> Result<(), FiniteError>
where
    T: Serialize + ?Sized,
{
    value.serialize(&mut FiniteCheck::default())
}

#[derive(Default)]
struct FiniteCheck {
    path: Vec<String>,
    indices: Vec<usize>,
    pending_key: Option<String>,
}

impl FiniteCheck {
    fn float(&self, value: f64) -> Result<(), FiniteError> {
        if value.is_finite() {
            return Ok(());
        }
        let at = if self.path.is_empty() {
            "top level".to_string()
        } else {
            self.path.join(".")
        };
        Err(FiniteError(format!(
            "non-finite float {value} at {at} cannot be stored"
        )))
    }

    fn nested<T>(&mut self, segment: String, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.path.push(segment);
        value.serialize(&mut *self)?;
        self.path.pop();
        Ok(())
    }

    fn element<T>(&mut self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        let index = self.indices.last_mut().map_or(0, |i| {
            let current = *i;
            *i += 1;
            current
        });
        self.nested(index.to_string(), value)
    }

    fn close_sequence(&mut self) {
        self.indices.pop();
    }
}

macro_rules! accept {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> Result<(), FiniteError> {
                Ok(())
            }
        )*
    };
}

impl ser::Serializer for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    accept!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_i128(i128),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_u128(u128),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_f32(self, v: f32) -> Result<(), FiniteError> {
        self.float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<(), FiniteError> {
        self.float(v)
    }

    fn serialize_none(self) -> Result<(), FiniteError> {
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), FiniteError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Result<(), FiniteError> {
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.nested(variant.to_string(), value)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, FiniteError> {
        self.indices.push(0);
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self, FiniteError> {
        self.indices.push(0);
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, FiniteError> {
        self.indices.push(0);
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteError> {
        self.path.push(variant.to_string());
        self.indices.push(0);
        Ok(self)
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, FiniteError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self, FiniteError> {
        self.path.push(variant.to_string());
        Ok(self)
    }
}

impl ser::SerializeSeq for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<(), FiniteError> {
        self.close_sequence();
        Ok(())
    }
}

impl ser::SerializeTuple for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<(), FiniteError> {
        self.close_sequence();
        Ok(())
    }
}

impl ser::SerializeTupleStruct for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<(), FiniteError> {
        self.close_sequence();
        Ok(())
    }
}

impl ser::SerializeTupleVariant for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    fn end(self) -> Result<(), FiniteError> {
        self.close_sequence();
        self.path.pop();
        Ok(())
    }
}

impl ser::SerializeMap for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        key.serialize(&mut **self)?;
        let label = match serde_json::to_value(key) {
            Ok(serde_json::Value::String(s)) => s,
            Ok(other) => other.to_string(),
            Err(_) => "?".to_string(),
        };
        self.pending_key = Some(label);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        let key = self.pending_key.take().unwrap_or_else(|| "?".to_string());
        self.nested(key, value)
    }

    fn end(self) -> Result<(), FiniteError> {
        Ok(())
    }
}

impl ser::SerializeStruct for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.nested(key.to_string(), value)
    }

    fn end(self) -> Result<(), FiniteError> {
        Ok(())
    }
}

impl ser::SerializeStructVariant for &mut FiniteCheck {
    type Ok = ();
    type Error = FiniteError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), FiniteError>
    where
        T: Serialize + ?Sized,
    {
        self.nested(key.to_string(), value)
    }

    fn end(self) -> Result<(), FiniteError> {
        self.path.pop();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct Schedule {
        warmup: u32,
        decay: Vec<f32>,
    }

    #[derive(Serialize)]
    enum Optimizer {
        Sgd { momentum: f64 },
    }

    #[test]
    fn test_finite_values_pass() {
        let args = json!({"lr": 0.1, "layers": [64, 32], "tag": null, "nested": {"x": -1e300}});
        assert!(check_finite(&args).is_ok());
    }

    #[test]
    fn test_nan_in_map_is_reported_by_key() {
        let args = BTreeMap::from([("lr", f64::NAN)]);
        let err = check_finite(&args).unwrap_err();
        assert_eq!(err.to_string(), "non-finite float NaN at lr cannot be stored");
    }

    #[test]
    fn test_infinity_in_nested_sequence() {
        let schedule = Schedule {
            warmup: 10,
            decay: vec![0.5, f32::INFINITY],
        };
        let err = check_finite(&schedule).unwrap_err();
        assert!(err.to_string().contains("at decay.1"), "{err}");
    }

    #[test]
    fn test_struct_variant_path() {
        let err = check_finite(&Optimizer::Sgd {
            momentum: f64::NEG_INFINITY,
        })
        .unwrap_err();
        assert!(err.to_string().contains("-inf at Sgd.momentum"), "{err}");
    }

    #[test]
    fn test_bare_float_reports_top_level() {
        let err = check_finite(&f64::NAN).unwrap_err();
        assert!(err.to_string().contains("at top level"));
    }
}
