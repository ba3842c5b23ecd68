use super::error::CounterError;

pub struct CounterReader<'a> {
    payload: &'a [u8],
}

impl<'a> CounterReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self { payload }
    }

    pub fn require_len(&self, needed: usize) -> Result<(), CounterError> {
        if self.payload.len() < needed {
            return Err(CounterError::TooShort {
                needed,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], CounterError> {
        self.payload
            .get(range.clone())
            .ok_or(CounterError::TooShort {
                needed: range.end,
                actual: self.payload.len(),
            })
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, CounterError> {
        let bytes = self.read_slice(range)?;
        match bytes {
            [hi, lo] => Ok(u16::from_be_bytes([*hi, *lo])),
            _ => Err(CounterError::TooShort {
                needed: 2,
                actual: bytes.len(),
            }),
        }
    }
}
