//! Issue an invoice, download its PDF, then record a payment on it.
//!
//! `SZAMLAZZ_USER=... SZAMLAZZ_PASSWORD=... cargo run --example issue_invoice`

use chrono::Local;
use rust_decimal_macros::dec;
use szamla_agent::agent::{Client, CreditEntry, CreditEntryRequest, PaymentMethod};
use szamla_agent::xml::ElementTree;
use szamla_agent::{ClientConfig, ResponseVersion};
use tracing_subscriber::EnvFilter;

/// Minimal `xmlszamla` body: header, seller, buyer, one line.
fn invoice() -> ElementTree {
    let today = Local::now().date_naive();
    ElementTree::new()
        .with(
            "fejlec",
            ElementTree::new()
                .with("keltDatum", today)
                .with("teljesitesDatum", today)
                .with("fizetesiHataridoDatum", today + chrono::Days::new(8))
                .with("fizmod", "Átutalás")
                .with("penznem", "HUF")
                .with("szamlaNyelve", "hu"),
        )
        .with("elado", ElementTree::new())
        .with(
            "vevo",
            ElementTree::new()
                .with("nev", "Minta Kft.")
                .with("irsz", "1067")
                .with("telepules", "Budapest")
                .with("cim", "Teréz körút 40."),
        )
        .with(
            "tetelek",
            ElementTree::new().with(
                "tetel",
                ElementTree::new()
                    .with("megnevezes", "Konzultáció")
                    .with("mennyiseg", 1u32)
                    .with("mennyisegiEgyseg", "óra")
                    .with("nettoEgysegar", dec!(10000))
                    .with("afakulcs", "27")
                    .with("nettoErtek", dec!(10000))
                    .with("afaErtek", dec!(2700))
                    .with("bruttoErtek", dec!(12700)),
            ),
        )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::with_credentials(
        std::env::var("SZAMLAZZ_USER").unwrap_or_default(),
        std::env::var("SZAMLAZZ_PASSWORD").unwrap_or_default(),
    )
    .request_invoice_download(true)
    .response_version(ResponseVersion::V2)
    .build()?;
    let client = Client::new(config)?;

    println!("=== Issue invoice ===\n");
    let issued = client.issue_invoice(&invoice()).await?;
    println!("  number: {}", issued.invoice_id);
    println!("  net:    {:?}", issued.net_total);
    println!("  gross:  {:?}", issued.gross_total);
    if let Some(pdf) = &issued.pdf {
        let path = format!("{}.pdf", issued.invoice_id);
        std::fs::write(&path, pdf)?;
        println!("  pdf:    {path} ({} bytes)", pdf.len());
    }

    println!("\n=== Register payment ===\n");
    let payment = CreditEntry::new(
        Local::now().date_naive(),
        PaymentMethod::BankTransfer,
        issued.gross_total.unwrap_or(dec!(12700)),
    )
    .comment("demo");
    let paid = client
        .register_credit_entry(&CreditEntryRequest::new(issued.invoice_id.clone(), vec![payment]))
        .await?;
    println!("  {} paid, gross {:?}", paid.invoice_id, paid.gross_total);

    Ok(())
}
