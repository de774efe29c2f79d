mod currency;
mod record;
mod store;

pub use currency::Currency;
pub use record::{InvoiceForm, InvoiceId, InvoiceRecord};
pub use store::{InvoiceRepository, InvoiceStore, SharedInvoiceStore};
