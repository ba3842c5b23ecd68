//! Counter sensor decoding (fPort 1).
//!
//! The payload starts with a big-endian 16-bit counter. The decoder also
//! reports the counter scaled down by 100, which lets devices transmit
//! values with hundredths precision as plain integers. Bytes after the
//! counter are ignored.
//!
//! A payload shorter than the counter field is rejected with
//! [`error::CounterError::TooShort`] instead of being read past its end.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::parse_counter;
