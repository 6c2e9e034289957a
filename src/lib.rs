//! # szamla-agent
//!
//! Client for the Számlázz.hu invoicing agent. Requests are XML documents
//! posted as a single multipart field; responses mix XML bodies, `szlahu_*`
//! headers, and raw or base64-encoded PDFs.
//!
//! All monetary values use [`rust_decimal::Decimal`], dates [`chrono::NaiveDate`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//! use szamla_agent::agent::{Client, CreditEntry, CreditEntryRequest, PaymentMethod};
//! use szamla_agent::ClientConfig;
//!
//! # async fn run() -> Result<(), szamla_agent::AgentError> {
//! let config = ClientConfig::with_credentials("demo", "demo").build()?;
//! let client = Client::new(config)?;
//!
//! let payment = CreditEntry::new(
//!     NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
//!     PaymentMethod::BankTransfer,
//!     Decimal::new(12700, 0),
//! );
//! let summary = client
//!     .register_credit_entry(&CreditEntryRequest::new("E-2024-1", vec![payment]))
//!     .await?;
//! println!("{} paid, gross {:?}", summary.invoice_id, summary.gross_total);
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `http` (default) | `reqwest` transport with cookie store and `Client::new` |
//!
//! Without `http`, plug in your own [`agent::Transport`].

pub mod agent;
pub mod core;
pub mod xml;

// Re-export core types at crate root for convenience
pub use crate::core::*;
