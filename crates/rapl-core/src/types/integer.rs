use crate::{
    types::{ScalarType, TypeError},
    value::{Value, WireValue},
};

///
/// IntegerType
///
/// Wire: JSON integers, integral floats, and numeric strings.
/// Domain: `Value::Int`. Canonical wire form is a JSON integer.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct IntegerType;

impl IntegerType {
    pub const NAME: &'static str = "integer";

    #[expect(clippy::cast_possible_truncation)]
    fn integral_f64(f: f64) -> Option<i64> {
        // i64::MAX is not representable as f64; the bound is exclusive.
        const LIMIT: f64 = 9_223_372_036_854_775_808.0;

        let in_range = f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f);

        in_range.then_some(f as i64)
    }
}

impl ScalarType for IntegerType {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError> {
        let parsed = match wire {
            WireValue::Null => return Ok(Value::Null),
            WireValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(Self::integral_f64)),
            WireValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };

        parsed
            .map(Value::Int)
            .ok_or_else(|| TypeError::invalid(Self::NAME, wire))
    }

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::Int(i) => Ok(WireValue::from(*i)),
            other => Err(TypeError::unexpected(Self::NAME, other)),
        }
    }
}
