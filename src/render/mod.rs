pub mod html;
pub mod layout;
pub mod metrics;
pub mod pdf;

use std::{fmt, str::FromStr};

use crate::error::InvoiceError;

pub use html::HtmlRenderer;
pub use pdf::PdfRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderFormat {
    Pdf,
    Html,
}

impl RenderFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderFormat::Pdf => "pdf",
            RenderFormat::Html => "html",
        }
    }

    pub fn mime(self) -> mime::Mime {
        match self {
            RenderFormat::Pdf => mime::APPLICATION_PDF,
            RenderFormat::Html => mime::TEXT_HTML_UTF_8,
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderFormat {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(RenderFormat::Pdf),
            "html" => Ok(RenderFormat::Html),
            _ => Err(InvoiceError::UnsupportedFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    Pdf(Vec<u8>),
    Html(String),
}

/// A rendered artifact plus what a caller needs to deliver it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub file_name: String,
    pub body: RenderedBody,
}

impl Rendered {
    pub fn format(&self) -> RenderFormat {
        match self.body {
            RenderedBody::Pdf(_) => RenderFormat::Pdf,
            RenderedBody::Html(_) => RenderFormat::Html,
        }
    }

    pub fn mime(&self) -> mime::Mime {
        self.format().mime()
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.body {
            RenderedBody::Pdf(bytes) => bytes,
            RenderedBody::Html(html) => html.as_bytes(),
        }
    }

    pub fn as_html(&self) -> Option<&str> {
        match &self.body {
            RenderedBody::Html(html) => Some(html),
            RenderedBody::Pdf(_) => None,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self.body {
            RenderedBody::Pdf(bytes) => bytes,
            RenderedBody::Html(html) => html.into_bytes(),
        }
    }
}
