//! Request document assembly and response decoding, one pair per operation.
//!
//! Everything here is pure: builders validate caller input and return the
//! complete request document; decoders turn an already escalated response
//! into the operation's result.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use percent_encoding::percent_decode_str;
use rust_decimal::Decimal;
use tracing::warn;

use super::credit::CreditEntryRequest;
use super::document::DocumentType;
use super::transport::{RawResponse, ResponseHeaders};
use crate::core::*;
use crate::xml::{ElementTree, XmlFragment, XmlNode, XmlValue, project, render, strip_namespaces};

pub const HEADER_ERROR_CODE: &str = "szlahu_error_code";
pub const HEADER_ERROR_MESSAGE: &str = "szlahu_error";
pub const HEADER_INVOICE_ID: &str = "szlahu_szamlaszam";
pub const HEADER_NET_TOTAL: &str = "szlahu_nettovegosszeg";
pub const HEADER_GROSS_TOTAL: &str = "szlahu_bruttovegosszeg";
pub const HEADER_CUSTOMER_ACCOUNT_URL: &str = "szlahu_vevoifiokurl";

/// Path of the base64 PDF inside a version 2 `xmlszamlavalasz` response.
const PDF_PATH: &str = "xmlszamlavalasz.pdf";

fn unexpected(message: impl Into<String>) -> AgentError {
    AgentError::UnexpectedResponse(message.into())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Request building
// ---------------------------------------------------------------------------

/// Authentication elements; always the first children of the settings element.
pub fn auth_fields(credentials: &Credentials) -> ElementTree {
    match credentials {
        Credentials::Token(token) => ElementTree::new().with("szamlaagentkulcs", token),
        Credentials::UserPassword { user, password } => ElementTree::new()
            .with("felhasznalo", user)
            .with("jelszo", password),
    }
}

/// `xmlszamlaxml`: the root element doubles as the settings element.
pub fn build_invoice_data(config: &ClientConfig, request: &InvoiceDataRequest) -> AgentResult<String> {
    let invoice_id = non_blank(request.invoice_id.as_deref());
    let order_number = non_blank(request.order_number.as_deref());
    if invoice_id.is_none() && order_number.is_none() {
        return Err(AgentError::validation(
            "either invoice id or order number must be given",
        ));
    }

    let mut body = auth_fields(&config.credentials);
    body.push("szamlaszam", invoice_id);
    body.push("rendelesSzam", order_number);
    body.push("pdf", request.pdf);

    Ok(DocumentType::InvoiceData.wrap(&render(&body, 1)))
}

/// `xmlszamlast`. `today` is used as `keltDatum` unless the request sets one.
pub fn build_reversal(
    config: &ClientConfig,
    request: &ReversalRequest,
    today: NaiveDate,
) -> AgentResult<String> {
    let invoice_id = non_blank(Some(request.invoice_id.as_str()))
        .ok_or_else(|| AgentError::validation("invoice id must not be empty"))?;

    let mut settings = auth_fields(&config.credentials);
    settings.push("eszamla", request.e_invoice);
    settings.push("szamlaLetoltes", request.request_invoice_download);

    let body = ElementTree::new().with("beallitasok", settings).with(
        "fejlec",
        ElementTree::new()
            .with("szamlaszam", invoice_id)
            .with("keltDatum", request.issue_date.unwrap_or(today))
            .with("tipus", "SS"),
    );

    Ok(DocumentType::Reversal.wrap(&render(&body, 1)))
}

/// Settings block of `xmlszamla`, taken from the client configuration.
pub fn invoice_settings(config: &ClientConfig) -> ElementTree {
    let mut settings = auth_fields(&config.credentials);
    settings.push("eszamla", config.e_invoice);
    settings.push("szamlaLetoltes", config.request_invoice_download);
    settings.push("szamlaLetoltesPld", config.downloaded_invoice_count);
    settings.push("valaszVerzio", config.response_version.number());
    settings
}

/// `xmlszamla`: settings followed by the invoice's own fragment.
pub fn build_invoice<F: XmlFragment + ?Sized>(config: &ClientConfig, invoice: &F) -> String {
    let settings = ElementTree::new().with("beallitasok", invoice_settings(config));
    let mut body = render(&settings, 1);
    body.push_str(&invoice.to_xml(1));
    DocumentType::Invoice.wrap(&body)
}

/// Check that `taxpayer_id` is exactly eight ASCII digits.
pub fn validate_taxpayer_id(taxpayer_id: &str) -> AgentResult<()> {
    if taxpayer_id.len() == 8 && taxpayer_id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(AgentError::validation(format!(
            "taxpayer id must be exactly 8 digits, got {taxpayer_id:?}"
        )))
    }
}

/// `xmltaxpayer`
pub fn build_taxpayer(config: &ClientConfig, taxpayer_id: &str) -> AgentResult<String> {
    validate_taxpayer_id(taxpayer_id)?;
    let body = ElementTree::new()
        .with("beallitasok", auth_fields(&config.credentials))
        .with("torzsszam", taxpayer_id);
    Ok(DocumentType::TaxPayer.wrap(&render(&body, 1)))
}

/// `xmlszamlakifiz`: settings followed by every entry in input order.
pub fn build_credit_entries(config: &ClientConfig, request: &CreditEntryRequest) -> AgentResult<String> {
    let invoice_id = non_blank(Some(request.invoice_id.as_str()))
        .ok_or_else(|| AgentError::validation("invoice id must not be empty"))?;
    if request.entries.is_empty() {
        return Err(AgentError::validation("at least one credit entry is required"));
    }
    for (index, entry) in request.entries.iter().enumerate() {
        entry.validate().map_err(|e| match e {
            AgentError::Validation(msg) => AgentError::Validation(format!("credit entry {index}: {msg}")),
            other => other,
        })?;
    }

    let mut settings = auth_fields(&config.credentials);
    settings.push("szamlaszam", invoice_id);
    settings.push("adoszam", request.tax_number.as_deref().unwrap_or(""));
    settings.push("additiv", request.additive);

    let mut body = render(&ElementTree::new().with("beallitasok", settings), 1);
    for entry in &request.entries {
        body.push_str(&entry.to_xml(1));
    }
    Ok(DocumentType::CreditEntry.wrap(&body))
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// URL-decode a header value, treating `+` as a space.
pub fn decode_header_value(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// Service error carried by the `szlahu_error_code` / `szlahu_error` headers.
pub fn header_error(headers: &ResponseHeaders) -> Option<AgentError> {
    let code = headers.get(HEADER_ERROR_CODE)?;
    Some(AgentError::Service {
        code: code.trim().to_string(),
        message: headers
            .get(HEADER_ERROR_MESSAGE)
            .map(decode_header_value)
            .unwrap_or_default(),
    })
}

fn root_node(document: &XmlNode) -> Option<&XmlNode> {
    let tag = document.tags().next()?;
    document.first_node(tag)
}

/// Service error carried by a `hibakod` node under the root element.
pub fn embedded_error(document: &XmlNode) -> Option<AgentError> {
    let root = root_node(document)?;
    let code = root.first_text("hibakod")?;
    Some(AgentError::Service {
        code: code.trim().to_string(),
        message: root.first_text("hibauzenet").unwrap_or_default().to_string(),
    })
}

/// Unreadable totals are logged and read as `None`; they never fail the call.
fn header_amount(headers: &ResponseHeaders, name: &str) -> Option<Decimal> {
    let raw = non_blank(headers.get(name))?;
    match Decimal::from_str(raw) {
        Ok(amount) => Some(amount),
        Err(e) => {
            warn!(header = name, value = raw, error = %e, "ignoring non-numeric total");
            None
        }
    }
}

fn header_invoice_id(headers: &ResponseHeaders) -> AgentResult<String> {
    non_blank(headers.get(HEADER_INVOICE_ID))
        .map(str::to_string)
        .ok_or_else(|| unexpected(format!("missing {HEADER_INVOICE_ID} header")))
}

/// Summary fields shared by issue and reversal responses; `pdf` is left empty.
pub fn summary_from_headers(headers: &ResponseHeaders) -> AgentResult<InvoiceSummary> {
    Ok(InvoiceSummary {
        invoice_id: header_invoice_id(headers)?,
        net_total: header_amount(headers, HEADER_NET_TOTAL),
        gross_total: header_amount(headers, HEADER_GROSS_TOTAL),
        customer_account_url: headers.get(HEADER_CUSTOMER_ACCOUNT_URL).map(decode_header_value),
        pdf: None,
    })
}

/// The `szamla` subtree of a `getInvoiceData` response, unflattened.
pub fn decode_invoice_data(document: &XmlNode) -> AgentResult<XmlNode> {
    document
        .first_node("szamla")
        .cloned()
        .ok_or_else(|| unexpected("response has no szamla element"))
}

/// Reversal response: the body is the PDF when a download was requested.
pub fn decode_reversal(response: RawResponse, download_requested: bool) -> AgentResult<InvoiceSummary> {
    let mut summary = summary_from_headers(&response.headers)?;
    if download_requested {
        summary.pdf = Some(response.body);
    }
    Ok(summary)
}

/// Issue response. Version 1 carries the PDF as the raw body; version 2
/// carries it base64-encoded at `xmlszamlavalasz.pdf`.
pub fn decode_issued_invoice(
    config: &ClientConfig,
    response: RawResponse,
    document: Option<&XmlNode>,
) -> AgentResult<InvoiceSummary> {
    let mut summary = summary_from_headers(&response.headers)?;
    if !config.request_invoice_download {
        return Ok(summary);
    }
    summary.pdf = Some(match config.response_version {
        ResponseVersion::V1 => response.body,
        ResponseVersion::V2 => {
            let document = document.ok_or_else(|| unexpected("version 2 response was not XML"))?;
            decode_pdf_payload(document)?
        }
    });
    Ok(summary)
}

/// Base64-decode the projected `pdf` leaf. Whitespace inside the payload
/// (line wrapping) is ignored.
pub fn decode_pdf_payload(document: &XmlNode) -> AgentResult<Vec<u8>> {
    let projected = project(document, &[(PDF_PATH, "pdf")]);
    let encoded = projected
        .get("pdf")
        .and_then(XmlValue::as_text)
        .ok_or_else(|| unexpected(format!("response has no {PDF_PATH} element")))?;
    let compact: String = encoded.split_ascii_whitespace().collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| unexpected(format!("pdf payload is not valid base64: {e}")))
}

fn taxpayer_address(node: &XmlNode) -> TaxPayerAddress {
    let field = |tag: &str| node.first_text(tag).map(str::to_string);
    TaxPayerAddress {
        country_code: field("countryCode"),
        postal_code: field("postalCode"),
        city: field("city"),
        street_name: field("streetName"),
        public_place_category: field("publicPlaceCategory"),
        number: field("number"),
        building: field("building"),
        staircase: field("staircase"),
        floor: field("floor"),
        door: field("door"),
    }
}

/// NAV taxpayer answer. Namespaces are stripped before any lookup.
pub fn decode_taxpayer(document: XmlNode) -> AgentResult<TaxPayerResult> {
    let document = strip_namespaces(document);
    let response = root_node(&document).ok_or_else(|| unexpected("empty taxpayer response"))?;

    if response.first_text("taxpayerValidity") != Some("true") {
        return Ok(TaxPayerResult::Invalid);
    }

    let data = response
        .first_node("taxpayerData")
        .ok_or_else(|| unexpected("valid taxpayer without taxpayerData"))?;
    let detail = data
        .first_node("taxNumberDetail")
        .ok_or_else(|| unexpected("taxpayerData without taxNumberDetail"))?;
    let text = |node: &XmlNode, tag: &str| node.first_text(tag).map(str::to_string);

    Ok(TaxPayerResult::Valid(TaxPayer {
        taxpayer_id: text(detail, "taxpayerId")
            .ok_or_else(|| unexpected("taxNumberDetail without taxpayerId"))?,
        vat_code: text(detail, "vatCode"),
        county_code: text(detail, "countyCode"),
        taxpayer_name: text(data, "taxpayerName")
            .ok_or_else(|| unexpected("taxpayerData without taxpayerName"))?,
        taxpayer_short_name: text(data, "taxpayerShortName"),
        address: data
            .path("taxpayerAddressList.taxpayerAddressItem.taxpayerAddress")
            .and_then(XmlValue::as_node)
            .map(taxpayer_address),
    }))
}

/// Credit entry response: the body is plain text, only headers are read.
pub fn decode_credit_entries(headers: &ResponseHeaders) -> AgentResult<CreditEntrySummary> {
    Ok(CreditEntrySummary {
        invoice_id: header_invoice_id(headers)?,
        net_total: header_amount(headers, HEADER_NET_TOTAL),
        gross_total: header_amount(headers, HEADER_GROSS_TOTAL),
    })
}
