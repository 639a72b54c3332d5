#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    pub value: i32,
}

impl Integer {
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: i32::from_le_bytes(bytes[0..4].try_into().unwrap()),
        }
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.value.to_le_bytes()
    }
}
