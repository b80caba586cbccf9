//! Tally demo
//!
//! Opens a few accounts in an in-memory bank, moves money between them
//! and prints the resulting statements.
//!
//! Usage: cargo run --bin tally

use std::sync::{Arc, Mutex, PoisonError};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_core::statement::all;
use tally_core::{
    AccountType, Bank, OpenAccount, PinCode, RandomPinProvider, SecurityProvider, Statement,
    SystemClock, TransferRequest,
};
use tally_shared::AppConfig;
use tally_shared::types::{AccountId, Amount, Currency, TransferId};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    let currency = config.bank.currency;
    let pin_length = config.security.pin_length;
    info!(currency = %currency, statement_fee = %config.bank.statement_fee, "Configuration loaded");

    let mut bank = Bank::new(config, Arc::new(SystemClock));

    println!("== Personal account statement ==");
    let personal = bank.open_account(OpenAccount::new("Personal", AccountType::Personal));
    {
        let account = bank
            .account_mut(personal)
            .ok_or_else(|| anyhow::anyhow!("account {personal} vanished"))?;
        account.deposit(Amount::of("1000")?, "deposit")?;
        account.deposit(Amount::of("2000")?, "deposit")?;
        account.withdraw(Amount::of("500")?, "withdrawal")?;
        let statement = account.create_statement(&all())?;
        print_statement(&statement, currency);
    }

    println!("\n== Unsecured premium transfer ==");
    let a = bank.open_account(OpenAccount::new("A", AccountType::Premium));
    let b = bank.open_account(OpenAccount::new("B", AccountType::Premium));
    deposit(&mut bank, a, "300")?;
    let id = bank.initiate(TransferRequest::new(a, b, Amount::of("100")?, "transfer"))?;
    report(&bank, id, a, b, currency);

    println!("\n== Secured transfer ==");
    let outbox = Arc::new(Outbox::new(RandomPinProvider::new(pin_length)));
    let c = bank.open_account(
        OpenAccount::new("C", AccountType::Personal).with_outgoing_security(outbox.clone()),
    );
    let d = bank.open_account(OpenAccount::new("D", AccountType::Personal));
    deposit(&mut bank, c, "50")?;
    let id = bank.initiate(TransferRequest::new(c, d, Amount::of("20")?, "books"))?;
    report(&bank, id, c, d, currency);

    match bank.confirm_outgoing(id, &PinCode::new("not-a-pin")) {
        Ok(status) => println!("wrong PIN accepted?! status: {status}"),
        Err(err) => println!("wrong PIN: {err}"),
    }
    let pin = outbox
        .take()
        .ok_or_else(|| anyhow::anyhow!("no PIN was delivered for {id}"))?;
    let status = bank.confirm_outgoing(id, &pin)?;
    println!("delivered PIN: {status}");
    report(&bank, id, c, d, currency);

    Ok(())
}

/// Generates PINs and keeps the last one for the demo to "receive".
struct Outbox<P> {
    inner: P,
    delivered: Mutex<Option<PinCode>>,
}

impl<P> Outbox<P> {
    fn new(inner: P) -> Self {
        Self {
            inner,
            delivered: Mutex::new(None),
        }
    }

    fn take(&self) -> Option<PinCode> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl<P: SecurityProvider> SecurityProvider for Outbox<P> {
    fn generate(&self) -> PinCode {
        let pin = self.inner.generate();
        *self
            .delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(pin.clone());
        pin
    }
}

fn deposit(bank: &mut Bank, id: AccountId, amount: &str) -> anyhow::Result<()> {
    bank.account_mut(id)
        .ok_or_else(|| anyhow::anyhow!("account {id} vanished"))?
        .deposit(Amount::of(amount)?, "deposit")?;
    Ok(())
}

fn report(
    bank: &Bank,
    id: TransferId,
    from: AccountId,
    to: AccountId,
    currency: Currency,
) {
    let status = bank
        .transfer(id)
        .map_or_else(|| "unknown".to_string(), |t| t.status().to_string());
    let balance = |account: AccountId| {
        bank.account(account)
            .map_or_else(|| "n/a".to_string(), |a| format!("{} {currency}", a.balance()))
    };
    println!(
        "transfer {id}: {status}; sender {}, receiver {}",
        balance(from),
        balance(to)
    );
}

fn print_statement(statement: &Statement, currency: Currency) {
    println!(
        "{:<10} | {:<16} | {:>12} | {:>12}",
        "date", "description", "amount", "balance"
    );
    for line in statement {
        let date = line
            .timestamp
            .map(|t| t.format("%d/%m/%Y").to_string())
            .unwrap_or_default();
        println!(
            "{date:<10} | {:<16} | {:>12} | {:>12} {currency}",
            line.description,
            line.amount.formatted(),
            line.balance.formatted()
        );
    }
}
