use crate::error::PayloadError;
use crate::payload::Document;

/// Units accumulated for one request.
#[derive(Debug)]
pub struct Batch {
    document: Document,
    entries: usize,
    discriminator: Option<String>,
    label: Option<String>,
}

impl Batch {
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self {
            document,
            entries: 0,
            discriminator: None,
            label: None,
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    pub const fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// True until the first unit of the batch has been committed; header
    /// fields are copied while this holds.
    #[must_use]
    pub const fn header_pending(&self) -> bool {
        self.entries == 0
    }

    /// 1-based position the unit being appended will take.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        self.entries.saturating_add(1)
    }

    #[must_use]
    pub fn discriminator(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn set_discriminator(&mut self, value: &str) {
        self.discriminator = Some(value.trim().to_lowercase());
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_owned());
    }

    pub(crate) fn commit(&mut self) {
        self.entries = self.entries.saturating_add(1);
    }

    /// Position to roll back to if the next unit fails.
    pub(super) fn mark(&self) -> usize {
        self.document.children(self.document.root()).len()
    }

    /// Removes root children added after `mark`.
    pub(super) fn rollback(&mut self, mark: usize) -> Result<(), PayloadError> {
        let root = self.document.root();
        let added: Vec<_> = self
            .document
            .children(root)
            .into_iter()
            .skip(mark)
            .collect();
        for node in added {
            self.document.remove_node(node)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_removes_only_new_subtrees() -> Result<(), PayloadError> {
        let mut batch = Batch::new(Document::new());
        batch.document_mut().add_node(None, "event", &[("eventId", "1")])?;
        batch.commit();

        let mark = batch.mark();
        batch.document_mut().add_node(None, "event", &[("eventId", "2")])?;
        batch.rollback(mark)?;

        assert_eq!(batch.entries(), 1);
        assert!(!batch.header_pending());
        assert_eq!(batch.next_index(), 2);
        assert_eq!(
            batch.document().to_xml(),
            "<root><event eventId=\"1\" /></root>"
        );
        Ok(())
    }

    #[test]
    fn discriminator_is_normalized() {
        let mut batch = Batch::new(Document::new());
        batch.set_discriminator(" SAP R3 ");
        assert_eq!(batch.discriminator(), Some("sap r3"));
    }
}
