//! Session-scoped invoices and their two presentation forms.
//!
//! An [`InvoiceService`] validates form input into [`InvoiceRecord`]s kept in
//! an append-only [`InvoiceStore`], and renders any stored record either as a
//! 130mm × 160mm single-page PDF or as a self-contained HTML print view.
//!
//! ```no_run
//! use diy_invoice::{InvoiceForm, InvoiceService, RenderFormat};
//!
//! let mut service: InvoiceService = InvoiceService::default();
//! let record = service.create(InvoiceForm {
//!     client: "Acme".into(),
//!     description: "Logo design".into(),
//!     unit: "hours".into(),
//!     quantity: 2.0,
//!     rate: 50.0,
//!     currency: Some("USD".into()),
//! })?;
//! let pdf = service.render(record.id().as_str(), RenderFormat::Pdf)?;
//! std::fs::write(&pdf.file_name, pdf.as_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod format;
pub mod invoice;
pub mod render;
pub mod service;
pub mod settings;

pub use error::{Field, InvoiceError, RenderError, Result, ValidationError};
pub use invoice::{
    Currency, InvoiceForm, InvoiceId, InvoiceRecord, InvoiceRepository, InvoiceStore,
    SharedInvoiceStore,
};
pub use render::{HtmlRenderer, PdfRenderer, RenderFormat, Rendered, RenderedBody};
pub use service::InvoiceService;
pub use settings::Settings;
