//! Credit entries (`kifizetes`) registered against an issued invoice.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AgentError, AgentResult};
use crate::xml::{ElementTree, XmlFragment, render};

/// Payment method (`jogcim`) accepted by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    CreditCard,
    Cheque,
    CashOnDelivery,
    PayPal,
    SzepCard,
    OtpSimple,
}

impl PaymentMethod {
    /// Wire value, as listed in the agent documentation.
    pub const fn value(self) -> &'static str {
        match self {
            Self::Cash => "készpénz",
            Self::BankTransfer => "átutalás",
            Self::CreditCard => "bankkártya",
            Self::Cheque => "csekk",
            Self::CashOnDelivery => "utánvét",
            Self::PayPal => "PayPal",
            Self::SzepCard => "SZÉP kártya",
            Self::OtpSimple => "OTP Simple",
        }
    }
}

/// A single payment recorded on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditEntry {
    /// `datum`: payment date.
    pub date: NaiveDate,
    /// `jogcim`
    pub payment_method: PaymentMethod,
    /// `osszeg`: paid amount, in the invoice currency.
    pub amount: Decimal,
    /// `leiras`: free-text comment.
    pub comment: Option<String>,
}

impl CreditEntry {
    pub fn new(date: NaiveDate, payment_method: PaymentMethod, amount: Decimal) -> Self {
        Self {
            date,
            payment_method,
            amount,
            comment: None,
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Reject entries the agent would refuse.
    ///
    /// # Errors
    ///
    /// [`AgentError::Validation`] if the amount is zero.
    pub fn validate(&self) -> AgentResult<()> {
        if self.amount.is_zero() {
            return Err(AgentError::validation("credit entry amount must not be zero"));
        }
        Ok(())
    }

    fn element_tree(&self) -> ElementTree {
        ElementTree::new().with(
            "kifizetes",
            ElementTree::new()
                .with("datum", self.date)
                .with("jogcim", self.payment_method.value())
                .with("osszeg", self.amount)
                .with("leiras", self.comment.as_deref()),
        )
    }
}

impl XmlFragment for CreditEntry {
    fn to_xml(&self, indent: usize) -> String {
        render(&self.element_tree(), indent)
    }
}

/// Input for `registerCreditEntry` (`xmlszamlakifiz`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditEntryRequest {
    /// `szamlaszam`
    pub invoice_id: String,
    /// `adoszam`: buyer tax number; sent empty when `None`.
    pub tax_number: Option<String>,
    /// `additiv`: add to existing entries (`true`) or replace them.
    pub additive: bool,
    pub entries: Vec<CreditEntry>,
}

impl CreditEntryRequest {
    pub fn new(invoice_id: impl Into<String>, entries: Vec<CreditEntry>) -> Self {
        Self {
            invoice_id: invoice_id.into(),
            tax_number: None,
            additive: true,
            entries,
        }
    }

    pub fn tax_number(mut self, tax_number: impl Into<String>) -> Self {
        self.tax_number = Some(tax_number.into());
        self
    }

    pub fn additive(mut self, additive: bool) -> Self {
        self.additive = additive;
        self
    }
}
