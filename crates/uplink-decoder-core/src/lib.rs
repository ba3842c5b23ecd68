//! Uplink payload decoder core.
//!
//! Decodes the application payload of a LoRaWAN-style uplink into a
//! structured record. The host hands over the raw bytes together with the
//! fPort they arrived on; the decoder dispatches on the port and returns a
//! `{"data": ...}` record that serializes to the JSON shape network-server
//! integrations expect.
//!
//! Decoding is byte-oriented and side-effect free. Port decoders live in
//! `ports` and follow the layout/reader/parser split, so offsets are declared
//! once and every read is bounds-checked.
//!
//! Invariants:
//! - fPort 1 decodes a big-endian 16-bit counter and its value divided by 100.
//! - Every other fPort produces empty data, whatever the payload holds.
//! - A counter payload shorter than two bytes is rejected, never zero-filled.
//!
//! # Examples
//! ```
//! use uplink_decoder_core::{UplinkInput, decode_uplink};
//!
//! let input: UplinkInput = serde_json::from_str(r#"{"bytes":[1,44],"fPort":1}"#)?;
//! let output = decode_uplink(&input)?;
//! assert_eq!(
//!     serde_json::to_string(&output)?,
//!     r#"{"data":{"count":300,"float":3.0}}"#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

mod decoder;
mod ports;

pub use decoder::{DecodeError, decode_uplink};
pub use ports::counter::error::CounterError;

/// Uplink handed over by the host for decoding.
///
/// # Examples
/// ```
/// use uplink_decoder_core::UplinkInput;
///
/// let input: UplinkInput =
///     serde_json::from_str(r#"{"bytes":[255,230],"fPort":1,"variables":{"site":"a"}}"#)
///         .unwrap();
/// assert_eq!(input.f_port, 1);
/// assert_eq!(input.variables["site"], "a");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UplinkInput {
    /// Raw application payload.
    pub bytes: Vec<u8>,
    /// Application port the payload arrived on.
    #[serde(rename = "fPort")]
    pub f_port: u8,
    /// Configured device variables. Accepted for host compatibility; no
    /// decoder reads them.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl UplinkInput {
    /// Build an input with no device variables.
    pub fn new(bytes: Vec<u8>, f_port: u8) -> Self {
        Self {
            bytes,
            f_port,
            variables: BTreeMap::new(),
        }
    }
}

/// Decoder result wrapping the decoded payload under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UplinkOutput {
    pub data: DecodedPayload,
}

/// Decoded payload fields.
///
/// Serializes without a tag: `Empty` becomes `{}` and `Counter` becomes
/// `{"count": .., "float": ..}`. Reading back is strict: only those two
/// exact shapes are accepted.
///
/// # Examples
/// ```
/// use uplink_decoder_core::DecodedPayload;
///
/// let empty = serde_json::to_string(&DecodedPayload::Empty {}).unwrap();
/// assert_eq!(empty, "{}");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "DecodedPayloadFields")]
pub enum DecodedPayload {
    /// Counter sensor reading (fPort 1).
    Counter {
        /// Big-endian 16-bit counter from the first two payload bytes.
        count: u16,
        /// `count / 100`.
        float: f64,
    },
    /// No decoder registered for the port.
    Empty {},
}

/// Wire shape of [`DecodedPayload`] before the variant is picked.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DecodedPayloadFields {
    count: Option<u16>,
    float: Option<f64>,
}

impl TryFrom<DecodedPayloadFields> for DecodedPayload {
    type Error = String;

    fn try_from(fields: DecodedPayloadFields) -> Result<Self, Self::Error> {
        match (fields.count, fields.float) {
            (Some(count), Some(float)) => Ok(DecodedPayload::Counter { count, float }),
            (None, None) => Ok(DecodedPayload::Empty {}),
            (Some(_), None) => Err("counter data is missing `float`".to_string()),
            (None, Some(_)) => Err("counter data is missing `count`".to_string()),
        }
    }
}

impl DecodedPayload {
    /// True when no decoder produced fields for the uplink.
    pub fn is_empty(&self) -> bool {
        matches!(self, DecodedPayload::Empty {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_output_serializes_flat_fields() {
        let output = UplinkOutput {
            data: DecodedPayload::Counter {
                count: 65510,
                float: 655.1,
            },
        };
        let value = serde_json::to_value(&output).expect("output json");
        assert_eq!(value["data"]["count"], 65510);
        assert_eq!(value["data"]["float"], 655.1);
        assert_eq!(value["data"].as_object().map(|m| m.len()), Some(2));
    }

    #[test]
    fn empty_output_serializes_empty_object() {
        let output = UplinkOutput {
            data: DecodedPayload::Empty {},
        };
        let json = serde_json::to_string(&output).expect("output json");
        assert_eq!(json, r#"{"data":{}}"#);
    }

    #[test]
    fn output_round_trips_both_variants() {
        for json in [r#"{"data":{}}"#, r#"{"data":{"count":0,"float":0.0}}"#] {
            let output: UplinkOutput = serde_json::from_str(json).expect("parse output");
            assert_eq!(serde_json::to_string(&output).expect("output json"), json);
        }
    }

    #[test]
    fn output_rejects_partial_counter() {
        let err = serde_json::from_str::<UplinkOutput>(r#"{"data":{"count":65510}}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing `float`"), "{err}");

        let err = serde_json::from_str::<UplinkOutput>(r#"{"data":{"float":655.1}}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("missing `count`"), "{err}");
    }

    #[test]
    fn output_rejects_unknown_fields() {
        for json in [
            r#"{"data":{"junk":1}}"#,
            r#"{"data":{"count":65510,"float":655.1,"bogus":1}}"#,
        ] {
            let result = serde_json::from_str::<UplinkOutput>(json);
            assert!(result.is_err(), "{json} should be rejected");
        }
    }

    #[test]
    fn input_defaults_missing_variables() {
        let input: UplinkInput =
            serde_json::from_str(r#"{"bytes":[0,0],"fPort":2}"#).expect("parse input");
        assert_eq!(input, UplinkInput::new(vec![0, 0], 2));
    }

    #[test]
    fn input_rejects_out_of_range_bytes() {
        let result = serde_json::from_str::<UplinkInput>(r#"{"bytes":[256],"fPort":1}"#);
        assert!(result.is_err());
    }
}
