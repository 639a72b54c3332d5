#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Boolean {
    pub value: bool,
}

impl Boolean {
    pub fn new(value: bool) -> Self {
        Self { value }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            value: bytes[0] != 0,
        }
    }

    pub fn to_bytes(self) -> [u8; 1] {
        [self.value as u8]
    }
}
