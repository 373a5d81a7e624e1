use {
    super::{
        DocType,
        entry::{IndexEntry, types},
    },
    anyhow::{Context, Result},
    scraper::{Html, Selector},
    std::path::{Path, PathBuf},
};

/// Sphinx-generated documentation. Recognized by the generated general
/// index page in the source root; symbols are harvested from it rather
/// than by crawling every page.
pub(crate) struct Sphinx;

const INDEX_CANDIDATES: [&str; 2] = ["genindex-all.html", "genindex.html"];

impl Sphinx {
    fn genindex(root: &Path) -> Option<PathBuf> {
        INDEX_CANDIDATES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
    }
}

impl DocType for Sphinx {
    fn name(&self) -> &'static str {
        "sphinx"
    }

    fn detect(&self, source: &Path) -> bool {
        Self::genindex(source).is_some()
    }

    fn entries(&self, documents: &Path) -> Result<Box<dyn Iterator<Item = Result<IndexEntry>>>> {
        let genindex = Self::genindex(documents)
            .context("The general index vanished from the copied documentation")?;
        let html = std::fs::read_to_string(&genindex)
            .with_context(|| format!("Failed to read index page: {}", genindex.display()))?;
        let entries = parse_genindex(&html)?;
        Ok(Box::new(entries.into_iter().map(Ok)))
    }

    fn patch_toc(&self, documents: &Path) -> Result<usize> {
        let mut patched = 0;
        for file in walkdir::WalkDir::new(documents) {
            let file = file.context("Failed to walk the copied documentation")?;
            if !file.file_type().is_file() {
                continue;
            }
            if file.path().extension().is_none_or(|ext| ext != "html") {
                continue;
            }
            patched += patch_page(file.path())?;
        }
        Ok(patched)
    }
}

fn parse_genindex(html: &str) -> Result<Vec<IndexEntry>> {
    let document = Html::parse_document(html);
    let anchors = Selector::parse("a[href]")
        .map_err(|e| anyhow::anyhow!("invalid anchor selector: {e}"))?;

    let mut entries = Vec::new();
    let mut seen = std::collections::HashSet::new();
    for anchor in document.select(&anchors) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !href.contains(".html") || href.starts_with("http") {
            continue;
        }
        let text = anchor.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let Some((name, entry_type)) = classify(text, href) else {
            continue;
        };
        if seen.insert((name.clone(), href.to_string())) {
            entries.push(IndexEntry {
                name,
                path: href.to_string(),
                entry_type,
            });
        }
    }
    Ok(entries)
}

/// Turn one genindex link into a qualified symbol name and type code.
///
/// Genindex display text carries the context in a trailing parenthetical,
/// e.g. `attach() (in module foo)`, `Bar (class in foo)` or
/// `baz() (foo.Bar method)`.
fn classify(text: &str, href: &str) -> Option<(String, &'static str)> {
    let (display, context) = split_context(text);
    let bare = display.trim_end_matches("()").trim();
    if bare.is_empty() {
        return None;
    }

    let Some(context) = context else {
        if href.contains("#module-") {
            return Some((bare.to_string(), types::MODULE));
        }
        let code = if display.ends_with("()") {
            types::FUNCTION
        } else {
            types::CONSTANT
        };
        return Some((bare.to_string(), code));
    };

    if context == "module" {
        return Some((bare.to_string(), types::MODULE));
    }
    if let Some(module) = context.strip_prefix("in module ") {
        let code = if display.ends_with("()") {
            types::FUNCTION
        } else {
            types::CONSTANT
        };
        return Some((format!("{module}.{bare}"), code));
    }
    if let Some(module) = context
        .strip_prefix("class in ")
        .or_else(|| context.strip_prefix("exception in "))
    {
        return Some((format!("{module}.{bare}"), types::CLASS));
    }
    if let Some(owner) = context
        .strip_suffix(" class method")
        .or_else(|| context.strip_suffix(" static method"))
    {
        return Some((format!("{owner}.{bare}"), types::CLASS_METHOD));
    }
    if let Some(owner) = context.strip_suffix(" method") {
        return Some((format!("{owner}.{bare}"), types::METHOD));
    }
    if let Some(owner) = context.strip_suffix(" attribute") {
        return Some((format!("{owner}.{bare}"), types::CONSTANT));
    }
    if context.ends_with("function") {
        return Some((bare.to_string(), types::FUNCTION));
    }

    Some((bare.to_string(), types::CONSTANT))
}

fn split_context(text: &str) -> (&str, Option<&str>) {
    if let Some(open) = text.rfind(" (") {
        if text.ends_with(')') {
            return (&text[..open], Some(&text[open + 2..text.len() - 1]));
        }
    }
    (text, None)
}

/// Insert a viewer anchor ahead of every identified definition so the
/// in-page table of contents can jump to it.
fn patch_page(path: &Path) -> Result<usize> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    // Legacy doc trees ship the occasional non-UTF-8 page; decode lossily
    // instead of failing the run after the index is already built.
    let html = String::from_utf8_lossy(&bytes);

    const MARKER: &str = "<dt id=\"";
    let mut out = String::with_capacity(html.len());
    let mut rest = html.as_ref();
    let mut count = 0;
    while let Some(pos) = rest.find(MARKER) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        if let Some(close) = tail[MARKER.len()..].find('"') {
            let id = &tail[MARKER.len()..MARKER.len() + close];
            out.push_str(&format!(
                "<a name=\"//apple_ref/cpp/{}/{}\" class=\"dashAnchor\"></a>",
                anchor_type(id),
                id
            ));
            count += 1;
        }
        out.push_str(&tail[..MARKER.len()]);
        rest = &tail[MARKER.len()..];
    }
    if count == 0 {
        return Ok(0);
    }
    out.push_str(rest);
    std::fs::write(path, out).with_context(|| format!("Failed to write: {}", path.display()))?;
    Ok(count)
}

fn anchor_type(id: &str) -> &'static str {
    if id.starts_with("module-") {
        return types::MODULE;
    }
    let leaf = id.rsplit('.').next().unwrap_or(id);
    if leaf.chars().next().is_some_and(char::is_uppercase) {
        types::CLASS
    } else if id.contains('.') {
        types::METHOD
    } else {
        types::FUNCTION
    }
}
