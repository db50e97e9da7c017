use anyhow::{anyhow, bail, Context, Result};
use lopdf::Document;

use crate::error::ProcessError;

/// The external library that owns the document model.
///
/// The workflow only needs to load bytes and write them back out; whatever
/// optimisation happens on the way is up to the implementation.
pub trait DocumentProcessor {
    type Document;

    fn load(&self, bytes: &[u8]) -> Result<Self::Document>;

    fn serialize(&self, document: Self::Document) -> Result<Vec<u8>>;
}

/// Load then re-serialize, tagging the failing step.
pub fn load_and_serialize<P>(processor: &P, bytes: &[u8]) -> Result<Vec<u8>, ProcessError>
where
    P: DocumentProcessor + ?Sized,
{
    let document = processor.load(bytes).map_err(ProcessError::Load)?;
    processor.serialize(document).map_err(ProcessError::Serialize)
}

/// `lopdf` backed processor. Leaves the document's metadata untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfProcessor;

impl DocumentProcessor for LopdfProcessor {
    type Document = Document;

    fn load(&self, bytes: &[u8]) -> Result<Document> {
        let doc = Document::load_mem(bytes).map_err(|e| anyhow!("{:?}", e))?;
        reject_encrypted(&doc)?;
        log::debug!(
            "Loaded PDF {} with {} objects, {} pages",
            doc.version,
            doc.objects.len(),
            doc.get_pages().len()
        );
        Ok(doc)
    }

    fn serialize(&self, mut document: Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .context("Failed to write document")?;
        Ok(buffer)
    }
}

fn reject_encrypted(doc: &Document) -> Result<()> {
    if doc.is_encrypted() {
        bail!("Document is encrypted");
    }
    Ok(())
}
