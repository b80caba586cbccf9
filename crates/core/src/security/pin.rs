//! Confirmation PIN.

use std::fmt;

/// Opaque confirmation code.
///
/// The secret never leaves the value: there is no accessor, `Debug` is
/// redacted, and the only operation is [`PinCode::validated_by`].
#[derive(Clone)]
pub struct PinCode(String);

impl PinCode {
    /// Wraps a secret.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Returns true if `presented` carries the same secret as `self`.
    ///
    /// Runs in time independent of where the first differing byte is.
    #[must_use]
    pub fn validated_by(&self, presented: &PinCode) -> bool {
        let expected = self.0.as_bytes();
        let actual = presented.0.as_bytes();
        if expected.len() != actual.len() {
            return false;
        }
        expected
            .iter()
            .zip(actual)
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub(crate) fn digits(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }
}

impl fmt::Debug for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinCode(****)")
    }
}

impl From<&str> for PinCode {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_by_matching_code() {
        let stored = PinCode::new("1234");
        assert!(stored.validated_by(&PinCode::new("1234")));
    }

    #[test]
    fn test_validated_by_rejects_mismatch() {
        let stored = PinCode::new("1234");
        assert!(!stored.validated_by(&PinCode::new("1235")));
        assert!(!stored.validated_by(&PinCode::new("123")));
        assert!(!stored.validated_by(&PinCode::new("12345")));
        assert!(!stored.validated_by(&PinCode::new("")));
    }

    #[test]
    fn test_debug_is_redacted() {
        let pin = PinCode::new("9876");
        let rendered = format!("{pin:?}");
        assert!(!rendered.contains("9876"));
        assert_eq!(rendered, "PinCode(****)");
    }
}
