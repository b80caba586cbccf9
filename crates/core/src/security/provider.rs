//! PIN generation capabilities.
//!
//! An account configured with a provider on a transfer leg requires the
//! generated PIN to be presented before that leg is confirmed. Delivering
//! the PIN to its owner (SMS, e-mail, authenticator) is the provider's job.

use std::sync::Arc;

use rand_core::{OsRng, RngCore, TryRngCore};

use super::pin::PinCode;

/// Largest multiple of ten representable in a `u32`; draws at or above it
/// are rejected so every digit is equally likely.
const DIGIT_CUTOFF: u32 = u32::MAX - (u32::MAX % 10);

/// Generates confirmation codes.
pub trait SecurityProvider: Send + Sync {
    /// Produces a fresh confirmation code.
    fn generate(&self) -> PinCode;
}

/// Shared handle to a security provider.
pub type SharedSecurity = Arc<dyn SecurityProvider>;

/// Numeric PINs drawn from the operating system's RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomPinProvider {
    length: usize,
}

impl RandomPinProvider {
    /// Creates a provider producing `length`-digit PINs (at least one digit).
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }
}

impl SecurityProvider for RandomPinProvider {
    fn generate(&self) -> PinCode {
        let mut rng = OsRng.unwrap_err();
        let mut secret = String::with_capacity(self.length);
        while secret.len() < self.length {
            let draw = rng.next_u32();
            if draw >= DIGIT_CUTOFF {
                continue;
            }
            if let Some(digit) = char::from_digit(draw % 10, 10) {
                secret.push(digit);
            }
        }
        PinCode::new(secret)
    }
}

/// Always hands out the same code. For tests and demos only.
#[derive(Debug, Clone)]
pub struct FixedPinProvider {
    code: PinCode,
}

impl FixedPinProvider {
    /// Creates a provider that always yields `code`.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: PinCode::new(code),
        }
    }
}

impl SecurityProvider for FixedPinProvider {
    fn generate(&self) -> PinCode {
        self.code.clone()
    }
}
