#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SmallInt {
    pub value: i16,
}

impl SmallInt {
    pub fn new(value: i16) -> Self {
        Self { value }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: i16::from_le_bytes(bytes[0..2].try_into().unwrap()),
        }
    }

    pub fn to_bytes(self) -> [u8; 2] {
        self.value.to_le_bytes()
    }
}
