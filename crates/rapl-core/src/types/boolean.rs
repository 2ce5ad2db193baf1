use crate::{
    types::{ScalarType, TypeError},
    value::{Value, WireValue},
};

///
/// BooleanType
///
/// Wire: JSON booleans, `0`/`1`, and the strings `true`/`false`/`1`/`0`
/// (case-insensitive). Domain: `Value::Bool`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanType;

impl BooleanType {
    pub const NAME: &'static str = "boolean";
}

impl ScalarType for BooleanType {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError> {
        let parsed = match wire {
            WireValue::Null => return Ok(Value::Null),
            WireValue::Bool(b) => Some(*b),
            WireValue::Number(n) => match n.as_u64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            WireValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };

        parsed
            .map(Value::Bool)
            .ok_or_else(|| TypeError::invalid(Self::NAME, wire))
    }

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::Bool(b) => Ok(WireValue::Bool(*b)),
            other => Err(TypeError::unexpected(Self::NAME, other)),
        }
    }
}
