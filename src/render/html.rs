//! Print-friendly HTML view of an invoice.

use crate::format::{escape_html, sanitize_filename};
use crate::invoice::InvoiceRecord;
use crate::settings::Settings;

const STYLE: &str = r#"body {
    font-family: "Segoe UI", sans-serif;
    background-color: #f2f2f2;
    padding: 40px;
    color: #333;
}
.invoice {
    background-color: #fff;
    border: 1px solid #ddd;
    padding: 30px;
    max-width: 600px;
    margin: auto;
    border-radius: 5px;
    box-shadow: 0 0 5px rgba(0,0,0,0.05);
}
h2 {
    color: #003366;
    text-align: center;
    margin-bottom: 20px;
}
p {
    line-height: 1.6;
}
strong {
    display: inline-block;
    width: 120px;
}"#;

pub struct HtmlRenderer {
    frame_height: u32,
}

impl HtmlRenderer {
    pub fn new(settings: &Settings) -> Self {
        Self {
            frame_height: settings.print_frame_height,
        }
    }

    pub fn file_name(record: &InvoiceRecord) -> String {
        sanitize_filename(&format!("invoice_{}.html", record.id()))
    }

    /// Self-contained document; every user-supplied value is escaped.
    pub fn render(&self, record: &InvoiceRecord) -> String {
        let mut html = String::with_capacity(STYLE.len() + 1024);
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(&record.title())));
        html.push_str("<style>\n");
        html.push_str(STYLE);
        html.push_str("\n</style>\n</head>\n<body>\n<div class=\"invoice\">\n");
        html.push_str(&format!("<h2>{}</h2>\n", escape_html(&record.title())));

        let rows = [
            ("Client", record.client().to_string()),
            ("Description", record.description().to_string()),
            ("Quantity", record.quantity_text()),
            ("Rate per Unit", record.rate_text()),
            ("Total", record.total_text()),
        ];
        for (label, value) in rows {
            html.push_str(&format!(
                "<p><strong>{}:</strong> {}</p>\n",
                label,
                escape_html(value.trim_end())
            ));
        }

        html.push_str("</div>\n</body>\n</html>\n");
        html
    }

    /// Wraps a rendered document in a sandboxed inline frame for embedding
    /// into another page.
    pub fn print_frame(&self, html: &str) -> String {
        format!(
            "<iframe sandbox srcdoc=\"{}\" width=\"100%\" height=\"{}\"></iframe>",
            escape_html(html),
            self.frame_height
        )
    }
}
