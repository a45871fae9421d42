//! Entropy sources used to seed key material
//!
//! An [`EntropySource`] fills a buffer and reports how many bytes it wrote.
//! Production code uses [`OsEntropy`]; test suites pick
//! [`DeterministicEntropy`] explicitly. The two share nothing but the trait.

use rand::rngs::OsRng;
use rand::RngCore;
use tracing::warn;

use crate::error::{Error, Result};

/// A provider of random bytes
pub trait EntropySource {
    /// Fill `dest` completely and return `dest.len()`, or return 0 without
    /// touching `dest` if the request cannot be satisfied.
    fn fill(&mut self, dest: &mut [u8]) -> usize;
}

/// Operating system CSPRNG
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> usize {
        match OsRng.try_fill_bytes(dest) {
            Ok(()) => dest.len(),
            Err(e) => {
                warn!("OS entropy source failed: {}", e);
                0
            }
        }
    }
}

/// Adapts a closure into an [`EntropySource`]
///
/// The closure carries whatever context it needs, the way a callback and its
/// opaque user pointer would.
pub struct FnEntropy<F>(pub F);

impl<F> EntropySource for FnEntropy<F>
where
    F: FnMut(&mut [u8]) -> usize,
{
    fn fill(&mut self, dest: &mut [u8]) -> usize {
        (self.0)(dest)
    }
}

/// Insecure fixed-output entropy for test suites
///
/// Every call returns the same byte pattern. Requests larger than
/// [`DeterministicEntropy::CAPACITY`] fail by returning 0. Never use this to
/// create keys that protect real funds.
#[derive(Debug, Clone)]
pub struct DeterministicEntropy {
    pattern: u8,
}

impl DeterministicEntropy {
    pub const CAPACITY: usize = 1024;

    pub fn new() -> Self {
        Self { pattern: 0 }
    }

    /// Entropy that repeats `pattern` for every byte
    pub fn with_pattern(pattern: u8) -> Self {
        Self { pattern }
    }
}

impl Default for DeterministicEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for DeterministicEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> usize {
        if dest.len() > Self::CAPACITY {
            return 0;
        }
        dest.fill(self.pattern);
        dest.len()
    }
}

/// Read exactly `size` bytes from `source`
///
/// Fails with [`Error::Entropy`] if the source reports anything other than a
/// complete fill; the partially filled buffer is discarded.
pub fn read_entropy(source: &mut dyn EntropySource, size: usize) -> Result<Vec<u8>> {
    let mut buffer = vec![0u8; size];
    let written = source.fill(&mut buffer);
    if written != size {
        warn!(requested = size, written, "entropy source returned a short fill");
        return Err(Error::Entropy(format!(
            "requested {} bytes, source provided {}",
            size, written
        )));
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_entropy_fills_buffer() {
        let bytes = read_entropy(&mut OsEntropy, 32).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_ne!(bytes, read_entropy(&mut OsEntropy, 32).unwrap());
    }

    #[test]
    fn test_deterministic_entropy_within_capacity() {
        let mut source = DeterministicEntropy::with_pattern(0xab);
        let bytes = read_entropy(&mut source, DeterministicEntropy::CAPACITY).unwrap();
        assert!(bytes.iter().all(|&b| b == 0xab));
        assert_eq!(read_entropy(&mut source, 16).unwrap(), vec![0xab; 16]);
    }

    #[test]
    fn test_deterministic_entropy_beyond_capacity() {
        let mut source = DeterministicEntropy::new();
        let mut buffer = vec![0x55u8; DeterministicEntropy::CAPACITY + 1];
        assert_eq!(source.fill(&mut buffer), 0);
        assert!(buffer.iter().all(|&b| b == 0x55));
        assert!(matches!(
            read_entropy(&mut source, DeterministicEntropy::CAPACITY + 1),
            Err(Error::Entropy(_))
        ));
    }

    #[test]
    fn test_fn_entropy() {
        let mut counter = 0u8;
        let mut source = FnEntropy(|dest: &mut [u8]| {
            for byte in dest.iter_mut() {
                counter = counter.wrapping_add(1);
                *byte = counter;
            }
            dest.len()
        });
        assert_eq!(read_entropy(&mut source, 3).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_short_fill_is_an_error() {
        let mut source = FnEntropy(|dest: &mut [u8]| dest.len() / 2);
        assert!(matches!(read_entropy(&mut source, 8), Err(Error::Entropy(_))));
    }
}
