use crate::{
    types::{ScalarType, TypeError},
    value::{Value, WireValue},
};

///
/// StringType
///
/// Wire: JSON strings; numbers are accepted and kept in their decoded text form.
/// Domain: `Value::Text`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct StringType;

impl StringType {
    pub const NAME: &'static str = "string";
}

impl ScalarType for StringType {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError> {
        match wire {
            WireValue::Null => Ok(Value::Null),
            WireValue::String(s) => Ok(Value::Text(s.clone())),
            WireValue::Number(n) => Ok(Value::Text(n.to_string())),
            _ => Err(TypeError::invalid(Self::NAME, wire)),
        }
    }

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::Text(s) => Ok(WireValue::String(s.clone())),
            other => Err(TypeError::unexpected(Self::NAME, other)),
        }
    }
}
