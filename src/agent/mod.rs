//! Agent operations: request documents, transport, and response decoding.
//!
//! # Example
//!
//! ```no_run
//! use szamla_agent::agent::Client;
//! use szamla_agent::{ClientConfig, TaxPayerResult};
//!
//! # async fn run() -> Result<(), szamla_agent::AgentError> {
//! let client = Client::new(ClientConfig::with_token("agent-key").build()?)?;
//! match client.query_taxpayer("12345678").await? {
//!     TaxPayerResult::Valid(taxpayer) => println!("{}", taxpayer.taxpayer_name),
//!     TaxPayerResult::Invalid => println!("not a valid tax number"),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
pub mod codec;
mod credit;
mod document;
mod transport;

pub use client::Client;
pub use credit::{CreditEntry, CreditEntryRequest, PaymentMethod};
pub use document::DocumentType;
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{MultipartRequest, REQUEST_FILE_NAME, RawResponse, ResponseHeaders, Transport};
