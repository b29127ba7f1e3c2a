use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received; increases the net amount
    Credit,
    /// Money spent; decreases the net amount
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "credit",
            TransactionType::Debit => "debit",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "credit" => Some(TransactionType::Credit),
            "debit" => Some(TransactionType::Debit),
            _ => None,
        }
    }

    /// Contribution of an amount of this type to the net amount.
    pub fn signed(&self, amount_cents: Cents) -> Cents {
        match self {
            TransactionType::Credit => amount_cents,
            TransactionType::Debit => -amount_cents,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The validated, mutable part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    pub date: NaiveDate,
    pub description: String,
    pub amount_cents: Cents,
    pub payment_method: String,
    pub transaction_category: String,
    pub transaction_type: TransactionType,
}

/// A single credit or debit entry in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: TransactionId,
    /// Calendar date the transaction happened
    pub date: NaiveDate,
    /// Free text, may be empty
    #[serde(default)]
    pub description: String,
    /// Magnitude in cents, never negative
    pub amount_cents: Cents,
    /// e.g. "Cash", "CreditCard", "GooglePay"
    pub payment_method: String,
    /// e.g. "groceries", "bills", "salary"
    pub transaction_category: String,
    pub transaction_type: TransactionType,
}

impl TransactionRecord {
    /// Create a record with a freshly generated id.
    pub fn new(fields: TransactionFields) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: fields.date,
            description: fields.description,
            amount_cents: fields.amount_cents,
            payment_method: fields.payment_method,
            transaction_category: fields.transaction_category,
            transaction_type: fields.transaction_type,
        }
    }

    /// Replace every mutable field, keeping the id.
    pub fn overwrite(&mut self, fields: TransactionFields) {
        self.date = fields.date;
        self.description = fields.description;
        self.amount_cents = fields.amount_cents;
        self.payment_method = fields.payment_method;
        self.transaction_category = fields.transaction_category;
        self.transaction_type = fields.transaction_type;
    }

    /// This record's contribution to the net amount.
    pub fn signed_amount(&self) -> Cents {
        self.transaction_type.signed(self.amount_cents)
    }

    pub fn fields(&self) -> TransactionFields {
        TransactionFields {
            date: self.date,
            description: self.description.clone(),
            amount_cents: self.amount_cents,
            payment_method: self.payment_method.clone(),
            transaction_category: self.transaction_category.clone(),
            transaction_type: self.transaction_type,
        }
    }
}

/// Unvalidated input for creating or updating a transaction.
///
/// Every field is optional so that missing values can be reported together.
/// The transaction type is kept as raw text and checked during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount_cents: Option<Cents>,
    pub payment_method: Option<String>,
    pub transaction_category: Option<String>,
    pub transaction_type: Option<String>,
}

impl TransactionInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount_cents: Cents) -> Self {
        self.amount_cents = Some(amount_cents);
        self
    }

    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.transaction_category = Some(category.into());
        self
    }

    pub fn with_type(mut self, transaction_type: impl Into<String>) -> Self {
        self.transaction_type = Some(transaction_type.into());
        self
    }

    /// Check field presence and shape.
    ///
    /// An amount of zero is present; only an absent amount is missing. Empty
    /// strings count as missing for the required text fields.
    pub fn validate(self) -> Result<TransactionFields, ValidationError> {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|s| !s.is_empty())
        }

        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        if self.amount_cents.is_none() {
            missing.push("amount");
        }
        if !present(&self.payment_method) {
            missing.push("paymentMethod");
        }
        if !present(&self.transaction_category) {
            missing.push("transactionCategory");
        }
        if !present(&self.transaction_type) {
            missing.push("transactionType");
        }

        let (
            Some(date),
            Some(amount_cents),
            Some(payment_method),
            Some(transaction_category),
            Some(type_str),
        ) = (
            self.date,
            self.amount_cents,
            self.payment_method,
            self.transaction_category,
            self.transaction_type,
        )
        else {
            return Err(ValidationError::MissingFields(missing));
        };
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let description = self.description.unwrap_or_default();
        if !description.is_empty() && description.trim().is_empty() {
            return Err(ValidationError::BlankDescription);
        }
        if amount_cents < 0 {
            return Err(ValidationError::NegativeAmount(amount_cents));
        }
        let transaction_type = TransactionType::from_str(&type_str)
            .ok_or(ValidationError::UnknownTransactionType(type_str))?;

        Ok(TransactionFields {
            date,
            description,
            amount_cents,
            payment_method,
            transaction_category,
            transaction_type,
        })
    }
}

impl From<TransactionFields> for TransactionInput {
    fn from(fields: TransactionFields) -> Self {
        Self {
            date: Some(fields.date),
            description: Some(fields.description),
            amount_cents: Some(fields.amount_cents),
            payment_method: Some(fields.payment_method),
            transaction_category: Some(fields.transaction_category),
            transaction_type: Some(fields.transaction_type.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Names of the required fields that were absent or empty
    MissingFields(Vec<&'static str>),
    BlankDescription,
    NegativeAmount(Cents),
    UnknownTransactionType(String),
    /// The net amount would leave the range of `Cents`
    NetAmountOverflow,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingFields(fields) => {
                write!(f, "Missing required fields: {}", fields.join(", "))
            }
            ValidationError::BlankDescription => {
                write!(f, "Description cannot be just spaces")
            }
            ValidationError::NegativeAmount(cents) => {
                write!(f, "Amount must not be negative (got {} cents)", cents)
            }
            ValidationError::UnknownTransactionType(t) => {
                write!(f, "Transaction type must be 'credit' or 'debit', got '{}'", t)
            }
            ValidationError::NetAmountOverflow => {
                write!(f, "Amount would overflow the net amount spent")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
