//! Error types for invoice creation, lookup and rendering.

use std::fmt;

use thiserror::Error;

/// Result type alias for invoice operations.
pub type Result<T> = std::result::Result<T, InvoiceError>;

/// Form fields that can be reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Id,
    Client,
    Description,
    Quantity,
    Rate,
    Currency,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Client => "client",
            Field::Description => "description",
            Field::Quantity => "quantity",
            Field::Rate => "rate",
            Field::Currency => "currency",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected form input. Nothing is created when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter all fields: {0} is required")]
    MissingField(Field),

    #[error("quantity must be greater than zero (got {0})")]
    QuantityNotPositive(f64),

    #[error("quantity must be at least {min} (got {got})")]
    QuantityBelowMinimum { min: f64, got: f64 },

    #[error("rate must not be negative (got {0})")]
    NegativeRate(f64),

    #[error("{0} must be a finite number")]
    NotFinite(Field),

    #[error("unsupported currency: {0:?}")]
    UnknownCurrency(String),

    #[error("invalid invoice id: {0:?}")]
    InvalidId(String),
}

/// Failure inside a single render call. The store is never touched.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invoice is missing {0}, which the layout requires")]
    MissingField(Field),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

/// Errors surfaced by the invoice service and its stores.
#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invoice #{0} not found")]
    NotFound(String),

    #[error("Invoice #{0} already exists")]
    DuplicateId(String),

    #[error("unsupported render format: {0:?} (expected \"pdf\" or \"html\")")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("invalid settings: {0}")]
    Config(String),

    #[error("invoice store lock poisoned")]
    StorePoisoned,
}

impl InvoiceError {
    pub fn is_validation(&self) -> bool {
        matches!(self, InvoiceError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InvoiceError::NotFound(_))
    }
}
