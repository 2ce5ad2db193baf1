use crate::{
    types::{ScalarType, TypeError},
    value::{Value, WireValue},
};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

///
/// DateTimeType
///
/// Wire: RFC 3339 strings or integer unix seconds.
/// Domain: `Value::DateTime`. Canonical wire form is RFC 3339.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct DateTimeType;

impl DateTimeType {
    pub const NAME: &'static str = "datetime";
}

impl ScalarType for DateTimeType {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError> {
        let parsed = match wire {
            WireValue::Null => return Ok(Value::Null),
            WireValue::String(s) => OffsetDateTime::parse(s.trim(), &Rfc3339).ok(),
            WireValue::Number(n) => n
                .as_i64()
                .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok()),
            _ => None,
        };

        parsed
            .map(Value::DateTime)
            .ok_or_else(|| TypeError::invalid(Self::NAME, wire))
    }

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::DateTime(dt) => dt
                .format(&Rfc3339)
                .map(WireValue::String)
                .map_err(|_| TypeError::unexpected(Self::NAME, value)),
            other => Err(TypeError::unexpected(Self::NAME, other)),
        }
    }
}
