//! Short code generation.
//!
//! Codes are drawn uniformly from a 62-character alphabet. The generator makes
//! no attempt to avoid collisions; uniqueness is enforced by the store's
//! conditional insert and the allocator's retry loop.

use rand::Rng;

/// Characters a short code may contain: digits, lowercase, uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 5;

/// Generates a code of `length` characters using the given RNG.
///
/// # Examples
///
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(1);
/// let code = generate_code_with(&mut rng, 5);
/// assert_eq!(code.len(), 5);
/// ```
pub fn generate_code_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generates a code of `length` characters from the thread-local RNG.
pub fn generate_code(length: usize) -> String {
    generate_code_with(&mut rand::rng(), length)
}

/// Source of candidate short codes for the allocator.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a fresh candidate. Called once per allocation attempt.
    fn generate(&self) -> String;
}

/// Production generator backed by the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// Creates a generator producing codes of `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_code(self.length)
    }
}
