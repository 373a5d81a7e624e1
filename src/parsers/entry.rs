/// One row of the docset search index: a symbol, its short type code and
/// the page (plus optional fragment) it lives on, relative to the
/// Documents root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IndexEntry {
    pub name: String,
    pub path: String,
    pub entry_type: &'static str,
}

/// Short type codes as the documentation viewer understands them. The
/// index stores whatever code a parser yields; the set is not closed.
pub(crate) mod types {
    pub const CLASS: &str = "cl";
    pub const FUNCTION: &str = "func";
    pub const METHOD: &str = "clm";
    // Legacy code for class/static methods, kept for docsets indexed by
    // older releases.
    pub const CLASS_METHOD: &str = "cm";
    pub const CONSTANT: &str = "clconst";
    pub const MODULE: &str = "mod";
}
