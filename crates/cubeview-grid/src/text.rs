/// Pseudo-random two-character labels for lit cells.
///
/// Simple LCG (Numerical Recipes constants). Seeded, so a grid built twice
/// from the same seed and frame is identical.
#[derive(Debug, Clone)]
pub struct CellText {
    state: u32,
}

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl CellText {
    /// Creates a generator; a zero seed is bumped to 1.
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// One base-36 digit (`0-9`, `a-z`).
    pub fn next_char(&mut self) -> char {
        // High bits; the low bits of an LCG cycle quickly.
        let i = (self.next_u32() >> 16) % 36;
        BASE36[i as usize] as char
    }

    /// Two base-36 digits.
    pub fn next_label(&mut self) -> [char; 2] {
        [self.next_char(), self.next_char()]
    }
}

impl Default for CellText {
    fn default() -> Self {
        Self::new(1)
    }
}
