use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

/// Lookup key for `getInvoiceData` (`xmlszamlaxml`).
///
/// At least one of invoice number or order number must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceDataRequest {
    /// `szamlaszam`: invoice number.
    pub invoice_id: Option<String>,
    /// `rendelesSzam`: order number the invoice was issued for.
    pub order_number: Option<String>,
    /// `pdf`: also return the PDF (base64) inside the response.
    pub pdf: bool,
}

impl InvoiceDataRequest {
    pub fn by_invoice_id(invoice_id: impl Into<String>) -> Self {
        Self {
            invoice_id: Some(invoice_id.into()),
            ..Self::default()
        }
    }

    pub fn by_order_number(order_number: impl Into<String>) -> Self {
        Self {
            order_number: Some(order_number.into()),
            ..Self::default()
        }
    }

    pub fn pdf(mut self, pdf: bool) -> Self {
        self.pdf = pdf;
        self
    }
}

/// Input for `reverseInvoice` (`xmlszamlast`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversalRequest {
    /// Number of the invoice to reverse.
    pub invoice_id: String,
    /// Issue the reversal as an e-invoice.
    pub e_invoice: bool,
    /// Return the reversal PDF in the response body.
    pub request_invoice_download: bool,
    /// `keltDatum` of the reversal; today when `None`.
    pub issue_date: Option<NaiveDate>,
}

impl ReversalRequest {
    pub fn new(invoice_id: impl Into<String>, e_invoice: bool, request_invoice_download: bool) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            e_invoice,
            request_invoice_download,
            issue_date: None,
        }
    }

    pub fn issue_date(mut self, date: NaiveDate) -> Self {
        self.issue_date = Some(date);
        self
    }
}

/// Outcome of issuing or reversing an invoice.
///
/// Summary fields come from the `szlahu_*` response headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    /// `szlahu_szamlaszam`
    pub invoice_id: String,
    /// `szlahu_nettovegosszeg`
    pub net_total: Option<Decimal>,
    /// `szlahu_bruttovegosszeg`
    pub gross_total: Option<Decimal>,
    /// `szlahu_vevoifiokurl`, URL-decoded.
    pub customer_account_url: Option<String>,
    /// Invoice PDF, present only when a download was requested.
    #[serde(skip)]
    pub pdf: Option<Vec<u8>>,
}

/// Outcome of registering credit entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEntrySummary {
    pub invoice_id: String,
    pub net_total: Option<Decimal>,
    pub gross_total: Option<Decimal>,
}

/// Answer of the NAV taxpayer query.
///
/// Serializes as `{"taxpayerValidity": false}`, or with the [`TaxPayer`]
/// fields beside `"taxpayerValidity": true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxPayerResult {
    /// The tax number is not valid; the service returns no further data.
    Invalid,
    /// The tax number is valid.
    Valid(TaxPayer),
}

impl Serialize for TaxPayerResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Flat<'a> {
            taxpayer_validity: bool,
            #[serde(flatten)]
            taxpayer: Option<&'a TaxPayer>,
        }

        Flat {
            taxpayer_validity: self.is_valid(),
            taxpayer: self.taxpayer(),
        }
        .serialize(serializer)
    }
}

impl TaxPayerResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn taxpayer(&self) -> Option<&TaxPayer> {
        match self {
            Self::Valid(taxpayer) => Some(taxpayer),
            Self::Invalid => None,
        }
    }
}

/// Registered taxpayer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPayer {
    /// First 8 digits of the Hungarian tax number (törzsszám).
    pub taxpayer_id: String,
    /// VAT code digit.
    pub vat_code: Option<String>,
    /// County code, two digits.
    pub county_code: Option<String>,
    pub taxpayer_name: String,
    pub taxpayer_short_name: Option<String>,
    /// First registered address; `None` when the list is empty or missing.
    pub address: Option<TaxPayerAddress>,
}

/// Address as reported in `taxpayerAddress`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxPayerAddress {
    pub country_code: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub street_name: Option<String>,
    pub public_place_category: Option<String>,
    pub number: Option<String>,
    pub building: Option<String>,
    pub staircase: Option<String>,
    pub floor: Option<String>,
    pub door: Option<String>,
}
