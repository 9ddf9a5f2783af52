use anyhow::{anyhow, Result};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Arc;

use crate::vault::ports::Rng;

pub const DEFAULT_LENGTH: usize = 16;

/// Lowercase, uppercase, digits, then the punctuation set. Characters are drawn from this
/// pool independently, so a result is not guaranteed to contain every class.
pub const ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

pub struct SystemRng;

impl Rng for SystemRng {
    fn fill(&self, bytes: &mut [u8]) -> Result<()> {
        let rng = SystemRandom::new();
        rng.fill(bytes)
            .map_err(|_| anyhow!("failed to obtain system randomness"))
    }
}

pub struct PasswordGenerator {
    rng: Arc<dyn Rng>,
}

impl PasswordGenerator {
    pub fn new(rng: Arc<dyn Rng>) -> Self {
        Self { rng }
    }

    pub fn generate(&self, length: usize) -> Result<String> {
        let mut out = String::with_capacity(length);
        for _ in 0..length {
            let idx = uniform_index(&*self.rng, ALPHABET.len())?;
            out.push(ALPHABET[idx] as char);
        }
        Ok(out)
    }
}

impl Default for PasswordGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemRng))
    }
}

/// Uniform index in `0..len` by rejection sampling on the u32 space.
pub(crate) fn uniform_index(rng: &dyn Rng, len: usize) -> Result<usize> {
    if len == 0 {
        return Err(anyhow!("empty pool"));
    }
    let n = len as u32;
    let zone = (u32::MAX / n) * n;
    loop {
        let mut b = [0u8; 4];
        rng.fill(&mut b)?;
        let x = u32::from_le_bytes(b);
        if x < zone {
            return Ok((x % n) as usize);
        }
    }
}
