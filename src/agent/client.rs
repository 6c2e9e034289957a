use chrono::Local;
use tracing::{debug, warn};

use super::codec;
use super::credit::CreditEntryRequest;
use super::document::DocumentType;
use super::transport::{MultipartRequest, RawResponse, Transport};
use crate::core::*;
use crate::xml::{XmlFragment, XmlNode, parse};

/// How the body of a successful response is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResponseMode {
    /// Parse as XML and check for an embedded error node.
    Xml,
    /// May be a raw PDF; never parsed.
    Binary,
    /// Plain text; never parsed.
    Text,
}

/// A response that passed error escalation.
#[derive(Debug)]
pub(crate) struct AgentResponse {
    pub raw: RawResponse,
    /// Present only for [`ResponseMode::Xml`].
    pub document: Option<XmlNode>,
}

/// Turn a raw response into either an error or a checked response.
///
/// Stages run in fixed order: HTTP status, error headers, then (XML mode
/// only) body parsing and the embedded error node.
pub(crate) fn escalate(raw: RawResponse, mode: ResponseMode) -> AgentResult<AgentResponse> {
    if raw.status != 200 {
        return Err(AgentError::Transport {
            status: Some(raw.status),
            status_text: raw.status_text,
        });
    }

    if let Some(err) = codec::header_error(&raw.headers) {
        return Err(err);
    }

    let document = match mode {
        ResponseMode::Binary | ResponseMode::Text => None,
        ResponseMode::Xml => {
            let text = std::str::from_utf8(&raw.body)
                .map_err(|e| AgentError::Parse(format!("response is not UTF-8: {e}")))?;
            let document = parse(text)?;
            if let Some(err) = codec::embedded_error(&document) {
                return Err(err);
            }
            Some(document)
        }
    };

    Ok(AgentResponse { raw, document })
}

/// Client for the Számlázz.hu agent.
///
/// Every operation is one multipart POST. Methods take `&self`, so a single
/// client can serve concurrent calls; the transport's cookie jar is the only
/// shared state.
#[derive(Debug, Clone)]
pub struct Client<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "http")]
impl Client<super::transport::HttpTransport> {
    /// Create a client using the default `reqwest` transport.
    ///
    /// # Errors
    ///
    /// [`AgentError::Config`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> AgentResult<Self> {
        Ok(Self::with_transport(config, super::transport::HttpTransport::new()?))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Toggle PDF download for subsequently issued invoices.
    pub fn set_request_invoice_download(&mut self, enabled: bool) {
        self.config.request_invoice_download = enabled;
    }

    #[tracing::instrument(skip_all, fields(document = doc.root_tag()))]
    async fn send(
        &self,
        doc: DocumentType,
        document: String,
        mode: ResponseMode,
    ) -> AgentResult<AgentResponse> {
        let request = MultipartRequest {
            endpoint: self.config.endpoint.clone(),
            field_name: doc.field_name(),
            document,
            expect_binary: mode == ResponseMode::Binary,
            timeout: self.config.timeout,
        };
        debug!(field = request.field_name, binary = request.expect_binary, "sending agent request");

        let raw = self.transport.post(request).await?;
        debug!(status = raw.status, bytes = raw.body.len(), "agent response received");

        escalate(raw, mode).inspect_err(|e| warn!(error = %e, "agent request failed"))
    }

    /// Fetch invoice data by invoice number or order number.
    ///
    /// Returns the `szamla` element of the response as parsed.
    ///
    /// # Errors
    ///
    /// [`AgentError::Validation`] when neither key is given; otherwise any
    /// transport, service, or parse error.
    pub async fn get_invoice_data(&self, request: &InvoiceDataRequest) -> AgentResult<XmlNode> {
        let document = codec::build_invoice_data(&self.config, request)?;
        let response = self
            .send(DocumentType::InvoiceData, document, ResponseMode::Xml)
            .await?;
        let parsed = response
            .document
            .ok_or_else(|| AgentError::UnexpectedResponse("missing XML body".into()))?;
        codec::decode_invoice_data(&parsed)
    }

    /// Reverse (storno) an invoice.
    pub async fn reverse_invoice(&self, request: &ReversalRequest) -> AgentResult<InvoiceSummary> {
        let document = codec::build_reversal(&self.config, request, Local::now().date_naive())?;
        let response = self
            .send(DocumentType::Reversal, document, ResponseMode::Binary)
            .await?;
        codec::decode_reversal(response.raw, request.request_invoice_download)
    }

    /// Issue an invoice rendered by `invoice`.
    ///
    /// Settings come from the client configuration. With response version 1
    /// the body is never parsed; with version 2 it is XML and the PDF is
    /// base64-decoded from it.
    pub async fn issue_invoice<F: XmlFragment + ?Sized>(&self, invoice: &F) -> AgentResult<InvoiceSummary> {
        let document = codec::build_invoice(&self.config, invoice);
        let mode = match self.config.response_version {
            ResponseVersion::V1 => ResponseMode::Binary,
            ResponseVersion::V2 => ResponseMode::Xml,
        };
        let response = self.send(DocumentType::Invoice, document, mode).await?;
        codec::decode_issued_invoice(&self.config, response.raw, response.document.as_ref())
    }

    /// Look up a Hungarian taxpayer by the 8-digit base of its tax number.
    pub async fn query_taxpayer(&self, taxpayer_id: &str) -> AgentResult<TaxPayerResult> {
        let document = codec::build_taxpayer(&self.config, taxpayer_id)?;
        let response = self
            .send(DocumentType::TaxPayer, document, ResponseMode::Xml)
            .await?;
        let parsed = response
            .document
            .ok_or_else(|| AgentError::UnexpectedResponse("missing XML body".into()))?;
        codec::decode_taxpayer(parsed)
    }

    /// Register payments against an issued invoice.
    pub async fn register_credit_entry(
        &self,
        request: &CreditEntryRequest,
    ) -> AgentResult<CreditEntrySummary> {
        let document = codec::build_credit_entries(&self.config, request)?;
        let response = self
            .send(DocumentType::CreditEntry, document, ResponseMode::Text)
            .await?;
        codec::decode_credit_entries(&response.raw.headers)
    }
}
