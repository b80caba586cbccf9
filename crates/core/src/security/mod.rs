//! Two-factor confirmation for transfer legs.

pub mod pin;
pub mod provider;

pub use pin::PinCode;
pub use provider::{FixedPinProvider, RandomPinProvider, SecurityProvider, SharedSecurity};
