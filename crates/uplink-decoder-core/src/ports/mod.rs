//! Per-port payload decoders.
//!
//! Each port decoder follows a layered structure:
//! - `layout`: byte offsets and ranges (source of truth)
//! - `reader`: bounds-checked byte access
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Parsers are pure and contain no I/O; the decoder layer dispatches on
//! fPort and wraps results into the uplink output record.

pub mod counter;
