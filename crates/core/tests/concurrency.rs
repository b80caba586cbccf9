//! Concurrent confirmation through a shared bank.

use std::sync::{Arc, Mutex};
use std::thread;

use rust_decimal_macros::dec;
use tally_core::{
    AccountType, Bank, FixedPinProvider, OpenAccount, PinCode, SystemClock, TransferRequest,
    TransferStatus,
};
use tally_shared::AppConfig;
use tally_shared::types::Amount;

#[test]
fn racing_confirmations_commit_exactly_once() {
    let mut bank = Bank::new(AppConfig::default(), Arc::new(SystemClock));
    let a = bank.open_account(
        OpenAccount::new("A", AccountType::Personal)
            .with_outgoing_security(Arc::new(FixedPinProvider::new("7777"))),
    );
    let b = bank.open_account(OpenAccount::new("B", AccountType::Personal));
    bank.account_mut(a)
        .unwrap()
        .deposit(Amount::from_decimal(dec!(100)), "seed")
        .unwrap();
    let id = bank
        .initiate(TransferRequest::new(
            a,
            b,
            Amount::from_decimal(dec!(60)),
            "race",
        ))
        .unwrap();

    let bank = Arc::new(Mutex::new(bank));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bank = Arc::clone(&bank);
            thread::spawn(move || {
                let pin = PinCode::new("7777");
                bank.lock().unwrap().confirm_outgoing(id, &pin).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), TransferStatus::Confirmed);
    }

    let bank = bank.lock().unwrap();
    assert_eq!(
        bank.account(a).unwrap().balance(),
        Amount::from_decimal(dec!(40))
    );
    assert_eq!(
        bank.account(b).unwrap().balance(),
        Amount::from_decimal(dec!(60))
    );
    assert_eq!(bank.account(b).unwrap().find_all().len(), 1);
}

#[test]
fn independent_transfers_from_many_threads() {
    let mut bank = Bank::new(AppConfig::default(), Arc::new(SystemClock));
    let hub = bank.open_account(OpenAccount::new("hub", AccountType::Premium));
    let spokes: Vec<_> = (0..6)
        .map(|i| bank.open_account(OpenAccount::new(format!("spoke-{i}"), AccountType::Personal)))
        .collect();

    let bank = Arc::new(Mutex::new(bank));
    let handles: Vec<_> = spokes
        .iter()
        .map(|&spoke| {
            let bank = Arc::clone(&bank);
            thread::spawn(move || {
                for _ in 0..5 {
                    bank.lock()
                        .unwrap()
                        .initiate(TransferRequest::new(
                            hub,
                            spoke,
                            Amount::from_decimal(dec!(10)),
                            "payout",
                        ))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let bank = bank.lock().unwrap();
    assert_eq!(
        bank.account(hub).unwrap().balance(),
        Amount::from_decimal(dec!(-300))
    );
    for spoke in spokes {
        assert_eq!(
            bank.account(spoke).unwrap().balance(),
            Amount::from_decimal(dec!(50))
        );
    }
    assert_eq!(bank.transfers().count(), 30);
}
