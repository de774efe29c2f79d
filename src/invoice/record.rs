use std::fmt;

use serde::{Deserialize, Serialize};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use uuid::Uuid;

use super::Currency;
use crate::error::{Field, ValidationError};
use crate::format::format_decimal;
use crate::settings::Settings;

const ID_LEN: usize = 8;

/// Short invoice identifier: the first 8 hex digits of a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct InvoiceId(String);

impl InvoiceId {
    pub fn generate() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        InvoiceId(uuid[..ID_LEN].to_string())
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let ok = s.len() == ID_LEN
            && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if ok {
            Ok(InvoiceId(s.to_string()))
        } else {
            Err(ValidationError::InvalidId(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InvoiceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

fn required_text(field: Field, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn finite(field: Field, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite(field))
    }
}

/// A validated, immutable invoice. `total` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    id: InvoiceId,
    client: String,
    description: String,
    unit: String,
    quantity: f64,
    rate: f64,
    currency: Currency,
    total: f64,
    created_at: String,
}

impl InvoiceRecord {
    /// Validates the fields and builds a record under a freshly generated id.
    pub fn create(
        client: &str,
        description: &str,
        unit: &str,
        quantity: f64,
        rate: f64,
        currency: &str,
    ) -> Result<Self, ValidationError> {
        Self::with_id(InvoiceId::generate(), client, description, unit, quantity, rate, currency)
    }

    pub fn with_id(
        id: InvoiceId,
        client: &str,
        description: &str,
        unit: &str,
        quantity: f64,
        rate: f64,
        currency: &str,
    ) -> Result<Self, ValidationError> {
        let client = required_text(Field::Client, client)?;
        let description = required_text(Field::Description, description)?;

        let quantity = finite(Field::Quantity, quantity)?;
        if quantity <= 0.0 {
            return Err(ValidationError::QuantityNotPositive(quantity));
        }
        let rate = finite(Field::Rate, rate)?;
        if rate < 0.0 {
            return Err(ValidationError::NegativeRate(rate));
        }
        let currency = currency.parse::<Currency>()?;

        Ok(Self {
            id,
            client,
            description,
            unit: unit.trim().to_string(),
            quantity,
            rate,
            currency,
            total: quantity * rate,
            created_at: now_iso(),
        })
    }

    pub fn id(&self) -> &InvoiceId {
        &self.id
    }

    pub fn client(&self) -> &str {
        &self.client
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// `"Invoice #{id}"`
    pub fn title(&self) -> String {
        format!("Invoice #{}", self.id)
    }

    /// `"{quantity} {unit}"`; the trailing space stays when the unit is empty.
    pub fn quantity_text(&self) -> String {
        format!("{} {}", format_decimal(self.quantity), self.unit)
    }

    pub fn rate_text(&self) -> String {
        format!("{} {}", self.currency, format_decimal(self.rate))
    }

    pub fn total_text(&self) -> String {
        format!("{} {}", self.currency, format_decimal(self.total))
    }

    /// One-line listing entry: `Invoice #id — client — CUR total`.
    pub fn summary_line(&self) -> String {
        format!("{} — {} — {}", self.title(), self.client, self.total_text())
    }

    pub fn detail_lines(&self) -> [String; 5] {
        [
            format!("Client: {}", self.client),
            format!("Description: {}", self.description),
            format!("Quantity: {}", self.quantity_text()),
            format!("Rate per Unit: {}", self.rate_text()),
            format!("Total: {}", self.total_text()),
        ]
    }
}

fn default_quantity() -> f64 {
    1.0
}

/// Raw form submission as the UI collaborator hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default)]
    pub rate: f64,
    /// Falls back to the configured default currency when absent or blank.
    #[serde(default)]
    pub currency: Option<String>,
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self {
            client: String::new(),
            description: String::new(),
            unit: String::new(),
            quantity: default_quantity(),
            rate: 0.0,
            currency: None,
        }
    }
}

impl InvoiceForm {
    pub fn into_record(self, id: InvoiceId, settings: &Settings) -> Result<InvoiceRecord, ValidationError> {
        let currency = self
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| settings.default_currency.code().to_string());

        let record = InvoiceRecord::with_id(
            id,
            &self.client,
            &self.description,
            &self.unit,
            self.quantity,
            self.rate,
            &currency,
        )?;

        if record.quantity() < settings.min_quantity {
            return Err(ValidationError::QuantityBelowMinimum {
                min: settings.min_quantity,
                got: record.quantity(),
            });
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InvoiceRecord {
        InvoiceRecord::with_id(
            InvoiceId::parse("abc12345").unwrap(),
            "Acme",
            "Logo design",
            "hours",
            2.0,
            50.0,
            "USD",
        )
        .unwrap()
    }

    #[test]
    fn total_is_quantity_times_rate() {
        let r = sample();
        assert_eq!(r.total(), 100.0);
        assert_eq!(r.total_text(), "USD 100.0");
        assert_eq!(r.quantity_text(), "2.0 hours");
        assert_eq!(r.rate_text(), "USD 50.0");
        assert_eq!(r.title(), "Invoice #abc12345");
    }

    #[test]
    fn generated_ids_are_eight_lower_hex_chars() {
        for _ in 0..64 {
            let id = InvoiceId::generate();
            assert!(InvoiceId::parse(id.as_str()).is_ok(), "bad id {id}");
        }
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "abc1234", "abc123456", "ABC12345", "xyz12345"] {
            assert_eq!(
                InvoiceId::parse(bad).unwrap_err(),
                ValidationError::InvalidId(bad.to_string())
            );
        }
    }

    #[test]
    fn blank_client_or_description_is_rejected() {
        assert_eq!(
            InvoiceRecord::create("  ", "Logo", "", 1.0, 1.0, "USD").unwrap_err(),
            ValidationError::MissingField(Field::Client)
        );
        assert_eq!(
            InvoiceRecord::create("Acme", "\t", "", 1.0, 1.0, "USD").unwrap_err(),
            ValidationError::MissingField(Field::Description)
        );
    }

    #[test]
    fn numeric_rules() {
        assert_eq!(
            InvoiceRecord::create("Acme", "Logo", "", 0.0, 1.0, "USD").unwrap_err(),
            ValidationError::QuantityNotPositive(0.0)
        );
        assert_eq!(
            InvoiceRecord::create("Acme", "Logo", "", 1.0, -0.5, "USD").unwrap_err(),
            ValidationError::NegativeRate(-0.5)
        );
        assert_eq!(
            InvoiceRecord::create("Acme", "Logo", "", f64::NAN, 1.0, "USD").unwrap_err(),
            ValidationError::NotFinite(Field::Quantity)
        );
        // The entity accepts fractional quantities below the form floor.
        assert!(InvoiceRecord::create("Acme", "Logo", "", 0.5, 10.0, "USD").is_ok());
    }

    #[test]
    fn unknown_currency_is_rejected() {
        assert_eq!(
            InvoiceRecord::create("Acme", "Logo", "", 1.0, 1.0, "BTC").unwrap_err(),
            ValidationError::UnknownCurrency("BTC".to_string())
        );
    }

    #[test]
    fn form_applies_floor_and_default_currency() {
        let settings = Settings::default();
        let form = InvoiceForm {
            client: "Acme".into(),
            description: "Copy".into(),
            quantity: 0.5,
            rate: 10.0,
            ..InvoiceForm::default()
        };
        assert_eq!(
            form.clone().into_record(InvoiceId::generate(), &settings).unwrap_err(),
            ValidationError::QuantityBelowMinimum { min: 1.0, got: 0.5 }
        );

        let ok = InvoiceForm { quantity: 3.0, ..form }
            .into_record(InvoiceId::generate(), &settings)
            .unwrap();
        assert_eq!(ok.currency(), Currency::Pkr);
        assert_eq!(ok.total(), 30.0);
    }

    #[test]
    fn form_deserializes_with_defaults() {
        let form: InvoiceForm =
            serde_json::from_str(r#"{"client":"Acme","description":"Logo","currency":"EUR"}"#).unwrap();
        assert_eq!(form.quantity, 1.0);
        assert_eq!(form.rate, 0.0);
        assert_eq!(form.currency.as_deref(), Some("EUR"));
    }

    #[test]
    fn summary_and_detail_lines() {
        let r = sample();
        assert_eq!(r.summary_line(), "Invoice #abc12345 — Acme — USD 100.0");
        assert_eq!(r.detail_lines()[2], "Quantity: 2.0 hours");
        assert_eq!(r.detail_lines()[4], "Total: USD 100.0");
    }
}
