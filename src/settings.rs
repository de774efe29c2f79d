use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{InvoiceError, Result};
use crate::invoice::Currency;

pub const DEFAULT_FOOTER_NOTE: &str = "Thank you!";
pub const DEFAULT_MIN_QUANTITY: f64 = 1.0;
pub const DEFAULT_PRINT_FRAME_HEIGHT: u32 = 500;

/// Session-independent knobs for the form and the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub default_currency: Currency,
    /// Form-level floor; the record itself only requires a positive quantity.
    pub min_quantity: f64,
    pub footer_note: String,
    pub print_frame_height: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_currency: Currency::Pkr,
            min_quantity: DEFAULT_MIN_QUANTITY,
            footer_note: DEFAULT_FOOTER_NOTE.to_string(),
            print_frame_height: DEFAULT_PRINT_FRAME_HEIGHT,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings = serde_json::from_str::<Settings>(json)
            .map_err(|e| InvoiceError::Config(format!("failed to parse settings: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            InvoiceError::Config(format!("failed to read settings at {}: {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<()> {
        if !self.min_quantity.is_finite() || self.min_quantity <= 0.0 {
            return Err(InvoiceError::Config(format!(
                "minQuantity must be a positive number (got {})",
                self.min_quantity
            )));
        }
        if self.print_frame_height == 0 {
            return Err(InvoiceError::Config("printFrameHeight must be non-zero".to_string()));
        }
        Ok(())
    }
}
