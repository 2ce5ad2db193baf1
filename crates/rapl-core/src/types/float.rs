use crate::{
    types::{ScalarType, TypeError},
    value::{Value, WireValue},
};

///
/// FloatType
///
/// Wire: JSON numbers and numeric strings. Non-finite values are rejected.
/// Domain: `Value::Float`.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct FloatType;

impl FloatType {
    pub const NAME: &'static str = "float";
}

impl ScalarType for FloatType {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn convert_to_domain_value(&self, wire: &WireValue) -> Result<Value, TypeError> {
        let parsed = match wire {
            WireValue::Null => return Ok(Value::Null),
            WireValue::Number(n) => n.as_f64(),
            WireValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        parsed
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| TypeError::invalid(Self::NAME, wire))
    }

    fn convert_to_wire_value(&self, value: &Value) -> Result<WireValue, TypeError> {
        match value {
            Value::Null => Ok(WireValue::Null),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(WireValue::Number)
                .ok_or_else(|| TypeError::unexpected(Self::NAME, value)),
            other => Err(TypeError::unexpected(Self::NAME, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn numbers_and_numeric_strings_convert() {
        assert_eq!(
            FloatType
                .convert_to_domain_value(&json!(1.25))
                .expect("float"),
            Value::Float(1.25)
        );
        assert_eq!(
            FloatType
                .convert_to_domain_value(&json!(3))
                .expect("integer widens"),
            Value::Float(3.0)
        );
        assert_eq!(
            FloatType
                .convert_to_domain_value(&json!("-0.5"))
                .expect("numeric string"),
            Value::Float(-0.5)
        );
    }

    #[test]
    fn non_finite_and_non_numeric_input_is_rejected() {
        for wire in [json!("NaN"), json!("inf"), json!("x"), json!(false)] {
            FloatType
                .convert_to_domain_value(&wire)
                .expect_err("input should be rejected");
        }
    }

    proptest! {
        #[test]
        fn domain_values_round_trip(f in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
            let wire = FloatType.convert_to_wire_value(&Value::Float(f)).unwrap();
            prop_assert_eq!(FloatType.convert_to_domain_value(&wire).unwrap(), Value::Float(f));
        }
    }
}
