//! Account types and the policy each one carries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tally_shared::types::Amount;
use thiserror::Error;

/// Error returned when a string names no account type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown account type: {input:?}")]
pub struct AccountTypeError {
    /// The rejected input.
    pub input: String,
}

impl AccountTypeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        "UNKNOWN_ACCOUNT_TYPE"
    }
}

/// Account type, deciding withdrawal and fee policy.
///
/// | type     | overdraft | statement fee |
/// |----------|-----------|---------------|
/// | Personal | denied    | charged       |
/// | Premium  | allowed   | free          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Ordinary account: no overdraft, statements cost a fee.
    Personal,
    /// Overdraft permitted, statements are free.
    Premium,
}

impl AccountType {
    /// Returns the string representation of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Premium => "premium",
        }
    }

    /// Returns true if the balance may go below zero.
    #[must_use]
    pub const fn allows_overdraft(self) -> bool {
        matches!(self, Self::Premium)
    }

    /// Returns true if creating a statement posts a fee.
    #[must_use]
    pub const fn charges_statement_fee(self) -> bool {
        matches!(self, Self::Personal)
    }

    /// Returns true if `amount` may be debited from an account holding `balance`.
    #[must_use]
    pub fn permits_debit(self, balance: Amount, amount: Amount) -> bool {
        self.allows_overdraft() || amount <= balance
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = AccountTypeError;

    /// Case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "premium" => Ok(Self::Premium),
            _ => Err(AccountTypeError {
                input: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn amount(value: rust_decimal::Decimal) -> Amount {
        Amount::from_decimal(value)
    }

    #[rstest]
    #[case(AccountType::Personal, dec!(100), dec!(50), true)]
    #[case(AccountType::Personal, dec!(100), dec!(100), true)]
    #[case(AccountType::Personal, dec!(100), dec!(100.01), false)]
    #[case(AccountType::Personal, dec!(0), dec!(1), false)]
    #[case(AccountType::Premium, dec!(100), dec!(50), true)]
    #[case(AccountType::Premium, dec!(0), dec!(1000), true)]
    #[case(AccountType::Premium, dec!(-50), dec!(10), true)]
    fn test_permits_debit(
        #[case] account_type: AccountType,
        #[case] balance: rust_decimal::Decimal,
        #[case] requested: rust_decimal::Decimal,
        #[case] expected: bool,
    ) {
        assert_eq!(
            account_type.permits_debit(amount(balance), amount(requested)),
            expected
        );
    }

    #[rstest]
    #[case(AccountType::Personal, false, true)]
    #[case(AccountType::Premium, true, false)]
    fn test_policy(
        #[case] account_type: AccountType,
        #[case] overdraft: bool,
        #[case] fee: bool,
    ) {
        assert_eq!(account_type.allows_overdraft(), overdraft);
        assert_eq!(account_type.charges_statement_fee(), fee);
    }

    #[rstest]
    #[case("personal", AccountType::Personal)]
    #[case("Personal", AccountType::Personal)]
    #[case("PREMIUM", AccountType::Premium)]
    fn test_from_str(#[case] input: &str, #[case] expected: AccountType) {
        assert_eq!(input.parse::<AccountType>(), Ok(expected));
    }

    #[test]
    fn test_from_str_rejects_unknown_type() {
        let err = "gold".parse::<AccountType>().unwrap_err();
        assert_eq!(err.input, "gold");
        assert_eq!(err.error_code(), "UNKNOWN_ACCOUNT_TYPE");
    }

    #[test]
    fn test_display_parses_back() {
        for account_type in [AccountType::Personal, AccountType::Premium] {
            assert_eq!(account_type.to_string().parse(), Ok(account_type));
        }
        assert_eq!(AccountType::Premium.to_string(), "premium");
    }
}
