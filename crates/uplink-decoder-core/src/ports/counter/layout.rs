pub const COUNTER_FPORT: u8 = 1;

pub const COUNT_RANGE: std::ops::Range<usize> = 0..2;

/// Divisor applied to the raw counter to obtain the scaled value.
pub const FLOAT_SCALE: f64 = 100.0;

pub const MIN_LEN: usize = COUNT_RANGE.end;
