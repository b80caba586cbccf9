//! Account and transfer arena.
//!
//! - `service` - The `Bank`: opens accounts, initiates and confirms transfers
//! - `process` - Account-opening parameters and transfer records

pub mod process;
pub mod service;


pub use process::{OpenAccount, TransferProcess};
pub use service::Bank;
