use crate::{
    codec::{DecodeError, WireDecoder},
    model::WireFormat,
    value::WireValue,
};

///
/// JsonDecoder
///

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDecoder;

impl WireDecoder for JsonDecoder {
    fn format(&self) -> WireFormat {
        WireFormat::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<WireValue, DecodeError> {
        serde_json::from_slice(bytes).map_err(|err| DecodeError::Malformed {
            format: WireFormat::Json,
            message: err.to_string(),
        })
    }
}
