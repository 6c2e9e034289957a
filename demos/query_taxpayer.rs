//! Look up a Hungarian taxpayer.
//!
//! `SZAMLAZZ_AGENT_KEY=... cargo run --example query_taxpayer -- 12345678`

use szamla_agent::agent::Client;
use szamla_agent::{AgentError, ClientConfig, TaxPayerResult};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AgentError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let key = std::env::var("SZAMLAZZ_AGENT_KEY").unwrap_or_default();
    let taxpayer_id = std::env::args().nth(1).unwrap_or_else(|| "12345678".into());

    let client = Client::new(ClientConfig::with_token(key).build()?)?;

    println!("=== Taxpayer {taxpayer_id} ===\n");
    match client.query_taxpayer(&taxpayer_id).await {
        Ok(TaxPayerResult::Valid(taxpayer)) => {
            println!("  name:       {}", taxpayer.taxpayer_name);
            println!(
                "  short name: {}",
                taxpayer.taxpayer_short_name.as_deref().unwrap_or("-")
            );
            println!(
                "  tax number: {}-{}-{}",
                taxpayer.taxpayer_id,
                taxpayer.vat_code.as_deref().unwrap_or("?"),
                taxpayer.county_code.as_deref().unwrap_or("??")
            );
            match taxpayer.address {
                Some(address) => println!(
                    "  address:    {} {} {} {}",
                    address.postal_code.unwrap_or_default(),
                    address.city.unwrap_or_default(),
                    address.street_name.unwrap_or_default(),
                    address.number.unwrap_or_default()
                ),
                None => println!("  address:    -"),
            }
        }
        Ok(TaxPayerResult::Invalid) => println!("  not a valid tax number"),
        Err(AgentError::Validation(msg)) => println!("  rejected locally: {msg}"),
        Err(e) => return Err(e),
    }

    Ok(())
}
