//! Property-based tests for the transfer state machine.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{AccountId, Amount, TransferId};

use crate::security::PinCode;
use crate::transfer::error::TransferError;
use crate::transfer::protocol::TransferLegs;
use crate::transfer::types::{
    TransferDirection, TransferPayload, TransferRequest, TransferState, TransferStatus,
};

const PIN: &str = "2468";
const MAX_ATTEMPTS: u32 = 3;

/// Two balances and the amount moving between them.
struct Pair {
    sender: Decimal,
    receiver: Decimal,
    amount: Decimal,
    outgoing_secure: bool,
    incoming_secure: bool,
    commits: u32,
}

impl Pair {
    fn payload(&self, secure: bool) -> TransferPayload {
        let request = TransferRequest::new(
            AccountId::new(),
            AccountId::new(),
            Amount::from_decimal(self.amount),
            "prop",
        );
        if secure {
            TransferPayload::Secure {
                transfer_id: TransferId::new(),
                code: PinCode::new(PIN),
                request,
            }
        } else {
            TransferPayload::NotSecure {
                transfer_id: TransferId::new(),
                request,
            }
        }
    }
}

impl TransferLegs for Pair {
    fn open_outgoing(&mut self) -> Result<TransferPayload, TransferError> {
        Ok(self.payload(self.outgoing_secure))
    }

    fn open_incoming(&mut self) -> Result<TransferPayload, TransferError> {
        Ok(self.payload(self.incoming_secure))
    }

    fn commit(&mut self) -> Result<(), TransferError> {
        self.sender -= self.amount;
        self.receiver += self.amount;
        self.commits += 1;
        Ok(())
    }
}

/// Something a caller can do to a transfer.
#[derive(Debug, Clone, Copy)]
enum Action {
    Step,
    Settle,
    Confirm(TransferDirection, bool),
}

fn arb_direction() -> impl Strategy<Value = TransferDirection> {
    prop_oneof![
        Just(TransferDirection::Outgoing),
        Just(TransferDirection::Incoming),
    ]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Step),
        Just(Action::Settle),
        (arb_direction(), any::<bool>()).prop_map(|(d, correct)| Action::Confirm(d, correct)),
    ]
}

fn arb_cents() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn apply(state: TransferState, action: Action, legs: &mut Pair) -> TransferState {
    match action {
        Action::Step => state.transition(legs).unwrap(),
        Action::Settle => state.settle(legs).unwrap(),
        Action::Confirm(direction, correct) => {
            let pin = PinCode::new(if correct { PIN } else { "0000" });
            state.confirm(direction, &pin, MAX_ATTEMPTS).into_state()
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The pair's total never changes, and balances only move on commit.
    #[test]
    fn prop_money_is_conserved(
        sender in arb_cents(),
        receiver in arb_cents(),
        amount in arb_cents(),
        outgoing_secure in any::<bool>(),
        incoming_secure in any::<bool>(),
        actions in prop::collection::vec(arb_action(), 0..30),
    ) {
        let mut legs = Pair { sender, receiver, amount, outgoing_secure, incoming_secure, commits: 0 };
        let total = sender + receiver;
        let mut state = TransferState::Initial;

        for action in actions {
            state = apply(state, action, &mut legs);
            prop_assert_eq!(legs.sender + legs.receiver, total);
            if legs.commits == 0 {
                prop_assert_eq!(legs.sender, sender);
                prop_assert_eq!(legs.receiver, receiver);
            }
        }
    }

    /// Commit happens at most once, and exactly once iff the transfer is confirmed.
    #[test]
    fn prop_commit_runs_exactly_once(
        outgoing_secure in any::<bool>(),
        incoming_secure in any::<bool>(),
        actions in prop::collection::vec(arb_action(), 0..30),
    ) {
        let mut legs = Pair {
            sender: Decimal::ONE_HUNDRED,
            receiver: Decimal::ZERO,
            amount: Decimal::TEN,
            outgoing_secure,
            incoming_secure,
            commits: 0,
        };
        let mut state = TransferState::Initial;

        for action in actions {
            state = apply(state, action, &mut legs);
            prop_assert!(legs.commits <= 1);
            prop_assert_eq!(legs.commits == 1, state.status() == TransferStatus::Confirmed);
        }
    }

    /// Correct PINs always drive a transfer to `Confirmed`.
    #[test]
    fn prop_correct_pins_confirm(
        outgoing_secure in any::<bool>(),
        incoming_secure in any::<bool>(),
        wrong_before in 0u32..MAX_ATTEMPTS,
    ) {
        let mut legs = Pair {
            sender: Decimal::ONE_HUNDRED,
            receiver: Decimal::ZERO,
            amount: Decimal::TEN,
            outgoing_secure,
            incoming_secure,
            commits: 0,
        };
        let wrong = PinCode::new("0000");
        let right = PinCode::new(PIN);
        let mut state = TransferState::Initial.settle(&mut legs).unwrap();

        while let Some(direction) = state.awaiting() {
            for _ in 0..wrong_before {
                state = state.confirm(direction, &wrong, MAX_ATTEMPTS).into_state();
            }
            state = state.confirm(direction, &right, MAX_ATTEMPTS).into_state().settle(&mut legs).unwrap();
        }

        prop_assert_eq!(state.status(), TransferStatus::Confirmed);
        prop_assert_eq!(legs.commits, 1);
    }
}
