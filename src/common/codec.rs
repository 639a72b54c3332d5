/// Fixed-width byte encoding for the keys and values stored inside hash
/// table pages. `encode` and `decode` operate on exactly `ENCODED_SIZE`
/// bytes.
pub trait PageCodec: Sized {
    const ENCODED_SIZE: usize;

    fn encode(&self, buf: &mut [u8]);
    fn decode(buf: &[u8]) -> Self;
}

impl PageCodec for i32 {
    const ENCODED_SIZE: usize = 4;

    fn encode(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.to_le_bytes());
    }

    fn decode(buf: &[u8]) -> Self {
        i32::from_le_bytes(buf[0..4].try_into().unwrap())
    }
}
