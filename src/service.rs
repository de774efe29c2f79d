use crate::error::{InvoiceError, Result};
use crate::invoice::{InvoiceForm, InvoiceId, InvoiceRecord, InvoiceRepository, InvoiceStore};
use crate::render::{HtmlRenderer, PdfRenderer, RenderFormat, Rendered, RenderedBody};
use crate::settings::Settings;

const MAX_ID_ATTEMPTS: usize = 8;

/// Validates form input into the session store and renders stored invoices.
pub struct InvoiceService<S = InvoiceStore> {
    store: S,
    settings: Settings,
    pdf: PdfRenderer,
    html: HtmlRenderer,
}

impl<S: InvoiceRepository> InvoiceService<S> {
    pub fn new(store: S, settings: Settings) -> Self {
        let pdf = PdfRenderer::new(&settings);
        let html = HtmlRenderer::new(&settings);
        Self {
            store,
            settings,
            pdf,
            html,
        }
    }

    /// Validates and appends. On failure the store is left unchanged.
    pub fn create(&mut self, form: InvoiceForm) -> Result<InvoiceRecord> {
        let id = self.fresh_id()?;
        let record = form.into_record(id, &self.settings).map_err(|e| {
            log::warn!("[invoice] rejected form input: {e}");
            InvoiceError::Validation(e)
        })?;

        self.store.insert(record.clone())?;
        log::debug!("[invoice] created {}", record.summary_line());
        Ok(record)
    }

    pub fn render(&self, id: &str, format: RenderFormat) -> Result<Rendered> {
        let record = self.lookup(id)?;
        log::debug!("[render] {} as {}", record.title(), format);

        let rendered = match format {
            RenderFormat::Pdf => Rendered {
                file_name: PdfRenderer::file_name(&record),
                body: RenderedBody::Pdf(self.pdf.render(&record)?),
            },
            RenderFormat::Html => Rendered {
                file_name: HtmlRenderer::file_name(&record),
                body: RenderedBody::Html(self.html.render(&record)),
            },
        };
        Ok(rendered)
    }

    /// Same as [`Self::render`] with the format given as text (`"pdf"` / `"html"`).
    pub fn render_as(&self, id: &str, format: &str) -> Result<Rendered> {
        self.render(id, format.parse()?)
    }

    /// HTML view wrapped in a sandboxed frame, ready to embed.
    pub fn print_view(&self, id: &str) -> Result<String> {
        let record = self.lookup(id)?;
        Ok(self.html.print_frame(&self.html.render(&record)))
    }

    pub fn get(&self, id: &str) -> Result<Option<InvoiceRecord>> {
        self.store.find(id)
    }

    /// Most recent first.
    pub fn invoices(&self) -> Result<Vec<InvoiceRecord>> {
        self.store.recent_first()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn lookup(&self, id: &str) -> Result<InvoiceRecord> {
        self.store.find(id)?.ok_or_else(|| {
            log::warn!("[invoice] render requested for unknown invoice #{id}");
            InvoiceError::NotFound(id.to_string())
        })
    }

    fn fresh_id(&self) -> Result<InvoiceId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = InvoiceId::generate();
            if !self.store.has(id.as_str())? {
                return Ok(id);
            }
            log::debug!("[invoice] id collision on {id}, regenerating");
        }
        Err(InvoiceError::DuplicateId(
            "no free invoice id after repeated attempts".to_string(),
        ))
    }
}

impl Default for InvoiceService<InvoiceStore> {
    fn default() -> Self {
        Self::new(InvoiceStore::new(), Settings::default())
    }
}
