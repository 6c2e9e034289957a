//! Request document types and their fixed preambles.

/// One request document type accepted by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    /// `xmlszamlaxml`: query invoice data.
    InvoiceData,
    /// `xmlszamlast`: reverse (storno) an invoice.
    Reversal,
    /// `xmlszamla`: issue an invoice.
    Invoice,
    /// `xmltaxpayer`: NAV taxpayer lookup.
    TaxPayer,
    /// `xmlszamlakifiz`: register credit entries (payments).
    CreditEntry,
}

impl DocumentType {
    pub const fn root_tag(self) -> &'static str {
        match self {
            Self::InvoiceData => "xmlszamlaxml",
            Self::Reversal => "xmlszamlast",
            Self::Invoice => "xmlszamla",
            Self::TaxPayer => "xmltaxpayer",
            Self::CreditEntry => "xmlszamlakifiz",
        }
    }

    /// Multipart field name the document is posted under.
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::InvoiceData => "action-szamla_agent_xml",
            Self::Reversal => "action-szamla_agent_st",
            Self::Invoice => "action-xmlagentxmlfile",
            Self::TaxPayer => "action-szamla_agent_taxpayer",
            Self::CreditEntry => "action-szamla_agent_kifiz",
        }
    }

    /// XML declaration plus the opening root tag, without trailing newline.
    pub const fn header(self) -> &'static str {
        match self {
            Self::InvoiceData => {
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmlszamlaxml xmlns=\"http://www.szamlazz.hu/xmlszamlaxml\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://www.szamlazz.hu/xmlszamlaxml https://www.szamlazz.hu/szamla/docs/xsds/agentpdf/xmlszamlaxml.xsd\">"
            }
            Self::Reversal => {
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmlszamlast xmlns=\"http://www.szamlazz.hu/xmlszamlast\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://www.szamlazz.hu/xmlszamlast https://www.szamlazz.hu/szamla/docs/xsds/agentst/xmlszamlast.xsd\">"
            }
            Self::Invoice => {
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmlszamla xmlns=\"http://www.szamlazz.hu/xmlszamla\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://www.szamlazz.hu/xmlszamla https://www.szamlazz.hu/szamla/docs/xsds/agent/xmlszamla.xsd\">"
            }
            Self::TaxPayer => {
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmltaxpayer xmlns=\"http://www.szamlazz.hu/xmltaxpayer\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://www.szamlazz.hu/xmltaxpayer https://www.szamlazz.hu/szamla/docs/xsds/agent/xmltaxpayer.xsd\">"
            }
            Self::CreditEntry => {
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<xmlszamlakifiz xmlns=\"http://www.szamlazz.hu/xmlszamlakifiz\" xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xsi:schemaLocation=\"http://www.szamlazz.hu/xmlszamlakifiz https://www.szamlazz.hu/szamla/docs/xsds/agentkifiz/xmlszamlakifiz.xsd\">"
            }
        }
    }

    /// Wrap an already rendered body (children at indent 1) into a full document.
    pub fn wrap(self, body: &str) -> String {
        format!("{}\n{body}</{}>\n", self.header(), self.root_tag())
    }
}
