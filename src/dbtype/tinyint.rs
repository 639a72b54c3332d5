#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TinyInt {
    pub value: i8,
}

impl TinyInt {
    pub fn new(value: i8) -> Self {
        Self { value }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: i8::from_le_bytes(bytes[0..1].try_into().unwrap()),
        }
    }

    pub fn to_bytes(self) -> [u8; 1] {
        self.value.to_le_bytes()
    }
}
