use {
    super::{
        DocType,
        entry::{IndexEntry, types},
    },
    anyhow::{Context, Result},
    scraper::{Html, Selector},
    std::path::Path,
};

/// pydoctor-generated documentation (Twisted-style API docs). Recognized
/// by its name index page, which links every documented object.
pub(crate) struct PyDoctor;

const NAME_INDEX: &str = "nameIndex.html";

impl DocType for PyDoctor {
    fn name(&self) -> &'static str {
        "pydoctor"
    }

    fn detect(&self, source: &Path) -> bool {
        let index = source.join(NAME_INDEX);
        match std::fs::read_to_string(&index) {
            | Ok(markup) => markup.to_ascii_lowercase().contains("pydoctor"),
            | Err(_) => false,
        }
    }

    fn entries(&self, documents: &Path) -> Result<Box<dyn Iterator<Item = Result<IndexEntry>>>> {
        let index = documents.join(NAME_INDEX);
        let html = std::fs::read_to_string(&index)
            .with_context(|| format!("Failed to read index page: {}", index.display()))?;
        let entries = parse_name_index(&html)?;
        Ok(Box::new(entries.into_iter().map(Ok)))
    }
}

fn parse_name_index(html: &str) -> Result<Vec<IndexEntry>> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]")
        .map_err(|e| anyhow::anyhow!("invalid anchor selector: {e}"))?;

    let mut entries = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains(".html") || href.starts_with("http") || href.starts_with('#') {
            continue;
        }
        let name = anchor.text().collect::<String>();
        let name = name.trim();
        // The name index links objects by their dotted name; anything else
        // on the page is navigation.
        if name.is_empty() || !name.contains('.') {
            continue;
        }
        if seen.insert((name.to_string(), href.to_string())) {
            entries.push(IndexEntry {
                name: name.to_string(),
                path: href.to_string(),
                entry_type: guess_type(name),
            });
        }
    }
    Ok(entries)
}

fn guess_type(name: &str) -> &'static str {
    let leaf = name.rsplit('.').next().unwrap_or(name);
    if leaf.chars().next().is_some_and(char::is_uppercase) {
        types::CLASS
    } else if name
        .strip_suffix(leaf)
        .and_then(|owner| owner.strip_suffix('.'))
        .and_then(|owner| owner.rsplit('.').next())
        .is_some_and(|parent| parent.chars().next().is_some_and(char::is_uppercase))
    {
        // Lowercase leaf hanging off a class: a method.
        types::METHOD
    } else {
        types::FUNCTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME_INDEX_HTML: &str = r##"
<html><head><meta name="generator" content="pydoctor"></head><body>
<a href="#A">A</a>
<a href="twisted.internet.html">twisted.internet</a>
<a href="twisted.internet.defer.Deferred.html">twisted.internet.defer.Deferred</a>
<a href="twisted.internet.defer.Deferred.html#addCallback">twisted.internet.defer.Deferred.addCallback</a>
<a href="twisted.internet.defer.html#succeed">twisted.internet.defer.succeed</a>
<a href="http://twistedmatrix.com/index.html">external</a>
</body></html>"##;

    fn write_index(dir: &Path) {
        std::fs::write(dir.join(NAME_INDEX), NAME_INDEX_HTML).unwrap();
    }

    #[test]
    fn detects_pydoctor_markup() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!PyDoctor.detect(tmp.path()));
        write_index(tmp.path());
        assert!(PyDoctor.detect(tmp.path()));
    }

    #[test]
    fn name_index_without_pydoctor_marker_is_not_detected() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(NAME_INDEX), "<html>epydoc</html>").unwrap();
        assert!(!PyDoctor.detect(tmp.path()));
    }

    #[test]
    fn parses_name_index_entries() {
        let entries = parse_name_index(NAME_INDEX_HTML).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "twisted.internet",
                "twisted.internet.defer.Deferred",
                "twisted.internet.defer.Deferred.addCallback",
                "twisted.internet.defer.succeed",
            ]
        );
        let find = |name: &str| entries.iter().find(|e| e.name == name).unwrap();
        assert_eq!(
            find("twisted.internet.defer.Deferred").entry_type,
            types::CLASS
        );
        assert_eq!(
            find("twisted.internet.defer.Deferred.addCallback").entry_type,
            types::METHOD
        );
        assert_eq!(find("twisted.internet.defer.succeed").entry_type, types::FUNCTION);
    }

    #[test]
    fn entries_stream_from_the_documents_tree() {
        let tmp = tempfile::tempdir().unwrap();
        write_index(tmp.path());
        let collected: Result<Vec<_>> = PyDoctor.entries(tmp.path()).unwrap().collect();
        assert_eq!(collected.unwrap().len(), 4);
    }
}
