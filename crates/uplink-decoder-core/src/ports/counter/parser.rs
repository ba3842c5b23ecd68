use super::error::CounterError;
use super::layout;
use super::reader::CounterReader;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterReading {
    pub count: u16,
    pub float: f64,
}

pub fn parse_counter(payload: &[u8]) -> Result<CounterReading, CounterError> {
    let reader = CounterReader::new(payload);
    reader.require_len(layout::MIN_LEN)?;

    let count = reader.read_u16_be(layout::COUNT_RANGE.clone())?;
    let float = f64::from(count) / layout::FLOAT_SCALE;

    Ok(CounterReading { count, float })
}
