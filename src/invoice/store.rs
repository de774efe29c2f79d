use std::collections::HashSet;
use std::iter::Rev;
use std::slice::Iter;
use std::sync::{Arc, RwLock};

use super::InvoiceRecord;
use crate::error::{InvoiceError, Result};

/// Storage seam used by [`crate::InvoiceService`].
pub trait InvoiceRepository {
    fn insert(&mut self, record: InvoiceRecord) -> Result<()>;
    fn find(&self, id: &str) -> Result<Option<InvoiceRecord>>;
    fn has(&self, id: &str) -> Result<bool>;
    fn count(&self) -> Result<usize>;
    /// Most recent first.
    fn recent_first(&self) -> Result<Vec<InvoiceRecord>>;
}

impl<R: InvoiceRepository + ?Sized> InvoiceRepository for &mut R {
    fn insert(&mut self, record: InvoiceRecord) -> Result<()> {
        (**self).insert(record)
    }

    fn find(&self, id: &str) -> Result<Option<InvoiceRecord>> {
        (**self).find(id)
    }

    fn has(&self, id: &str) -> Result<bool> {
        (**self).has(id)
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn recent_first(&self) -> Result<Vec<InvoiceRecord>> {
        (**self).recent_first()
    }
}

/// Append-only, insertion-ordered invoice log for one session.
#[derive(Debug, Default, Clone)]
pub struct InvoiceStore {
    records: Vec<InvoiceRecord>,
    ids: HashSet<String>,
}

impl InvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: InvoiceRecord) -> Result<()> {
        let id = record.id().as_str();
        if self.ids.contains(id) {
            log::warn!("[store] rejected duplicate invoice id {id}");
            return Err(InvoiceError::DuplicateId(id.to_string()));
        }
        self.ids.insert(id.to_string());
        self.records.push(record);
        Ok(())
    }

    /// Display order view; the underlying order is untouched.
    pub fn list_reversed(&self) -> Rev<Iter<'_, InvoiceRecord>> {
        self.records.iter().rev()
    }

    /// Insertion order.
    pub fn iter(&self) -> Iter<'_, InvoiceRecord> {
        self.records.iter()
    }

    pub fn get(&self, id: &str) -> Option<&InvoiceRecord> {
        self.records.iter().find(|r| r.id().as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl InvoiceRepository for InvoiceStore {
    fn insert(&mut self, record: InvoiceRecord) -> Result<()> {
        self.append(record)
    }

    fn find(&self, id: &str) -> Result<Option<InvoiceRecord>> {
        Ok(self.get(id).cloned())
    }

    fn has(&self, id: &str) -> Result<bool> {
        Ok(self.contains(id))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn recent_first(&self) -> Result<Vec<InvoiceRecord>> {
        Ok(self.list_reversed().cloned().collect())
    }
}

/// A session store handed to more than one caller. Appends take the write
/// lock; lookups and listings share the read lock.
#[derive(Debug, Default, Clone)]
pub struct SharedInvoiceStore {
    inner: Arc<RwLock<InvoiceStore>>,
}

impl SharedInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, record: InvoiceRecord) -> Result<()> {
        let mut guard = self.inner.write().map_err(|_| InvoiceError::StorePoisoned)?;
        guard.append(record)
    }

    pub fn get(&self, id: &str) -> Result<Option<InvoiceRecord>> {
        let guard = self.inner.read().map_err(|_| InvoiceError::StorePoisoned)?;
        Ok(guard.get(id).cloned())
    }

    pub fn list_reversed(&self) -> Result<Vec<InvoiceRecord>> {
        let guard = self.inner.read().map_err(|_| InvoiceError::StorePoisoned)?;
        Ok(guard.list_reversed().cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        let guard = self.inner.read().map_err(|_| InvoiceError::StorePoisoned)?;
        Ok(guard.len())
    }
}

impl InvoiceRepository for SharedInvoiceStore {
    fn insert(&mut self, record: InvoiceRecord) -> Result<()> {
        self.append(record)
    }

    fn find(&self, id: &str) -> Result<Option<InvoiceRecord>> {
        self.get(id)
    }

    fn has(&self, id: &str) -> Result<bool> {
        let guard = self.inner.read().map_err(|_| InvoiceError::StorePoisoned)?;
        Ok(guard.contains(id))
    }

    fn count(&self) -> Result<usize> {
        self.len()
    }

    fn recent_first(&self) -> Result<Vec<InvoiceRecord>> {
        self.list_reversed()
    }
}
