use thiserror::Error;
use tracing::{debug, trace};

use crate::ports::counter::error::CounterError;
use crate::ports::counter::{layout as counter_layout, parse_counter};
use crate::{DecodedPayload, UplinkInput, UplinkOutput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid input on fPort {f_port}: {source}")]
    InvalidInput {
        f_port: u8,
        #[source]
        source: CounterError,
    },
}

/// Decode one uplink into its output record.
///
/// fPort 1 carries the counter sensor; every other port yields empty data
/// without inspecting the payload.
///
/// # Examples
/// ```
/// use uplink_decoder_core::{DecodedPayload, UplinkInput, decode_uplink};
///
/// let output = decode_uplink(&UplinkInput::new(vec![255, 230, 255, 0], 1))?;
/// assert_eq!(
///     output.data,
///     DecodedPayload::Counter {
///         count: 65510,
///         float: 655.1
///     }
/// );
/// # Ok::<(), uplink_decoder_core::DecodeError>(())
/// ```
pub fn decode_uplink(input: &UplinkInput) -> Result<UplinkOutput, DecodeError> {
    let data = match input.f_port {
        counter_layout::COUNTER_FPORT => {
            let reading =
                parse_counter(&input.bytes).map_err(|source| DecodeError::InvalidInput {
                    f_port: input.f_port,
                    source,
                })?;
            debug!(
                f_port = input.f_port,
                payload_len = input.bytes.len(),
                count = reading.count,
                "decoded counter uplink"
            );
            DecodedPayload::Counter {
                count: reading.count,
                float: reading.float,
            }
        }
        f_port => {
            trace!(f_port, payload_len = input.bytes.len(), "no decoder for fPort");
            DecodedPayload::Empty {}
        }
    };

    Ok(UplinkOutput { data })
}
