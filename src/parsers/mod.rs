pub(crate) mod entry;
pub(crate) mod pydoctor;
pub(crate) mod sphinx;

use {anyhow::Result, entry::IndexEntry, std::path::Path};

/// One documentation-generator flavor: knows how to recognize its output
/// layout and how to turn it into search-index entries. Real flavors and
/// test stubs satisfy the same contract.
pub(crate) trait DocType {
    /// Display name used in progress output.
    fn name(&self) -> &'static str;

    /// Whether `source` looks like output of this generator.
    fn detect(&self, source: &Path) -> bool;

    /// Stream index entries out of the copied documentation tree.
    fn entries(&self, documents: &Path) -> Result<Box<dyn Iterator<Item = Result<IndexEntry>>>>;

    /// Patch per-symbol anchors into the copied pages so the viewer can
    /// offer an in-page table of contents. Returns the number of anchors
    /// added. Flavors without anchorable markup keep the default no-op.
    fn patch_toc(&self, documents: &Path) -> Result<usize> {
        let _ = documents;
        Ok(0)
    }
}

/// The flavors this tool ships, in detection order. First match wins;
/// the order is part of the contract.
pub(crate) fn default_doctypes() -> Vec<Box<dyn DocType>> {
    vec![Box::new(sphinx::Sphinx), Box::new(pydoctor::PyDoctor)]
}

pub(crate) fn get_doctype<'a>(
    doctypes: &'a [Box<dyn DocType>],
    source: &Path,
) -> Option<&'a dyn DocType> {
    doctypes
        .iter()
        .map(AsRef::as_ref)
        .find(|doctype| doctype.detect(source))
}
