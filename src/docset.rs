use {
    crate::{args::ConvertArgs, index::SearchIndex, paths::DocsetPaths},
    anyhow::{Context, Result},
    serde::Serialize,
    std::path::{Path, PathBuf},
    walkdir::WalkDir,
};

// Legacy constant written regardless of the detected flavor; the viewer
// keys certain behavior off it and existing docsets rely on it.
const DOCSET_FAMILY: &str = "python";

/// The bundle manifest, serialized as an XML property list.
#[derive(Debug, Serialize)]
pub(crate) struct InfoPlist {
    #[serde(rename = "CFBundleIdentifier")]
    pub identifier: String,
    #[serde(rename = "CFBundleName")]
    pub name: String,
    #[serde(rename = "DocSetPlatformFamily")]
    pub platform_family: String,
    #[serde(rename = "DashDocSetFamily")]
    pub family: String,
    #[serde(rename = "isDashDocset")]
    pub is_dash_docset: bool,
    #[serde(rename = "dashIndexFilePath", skip_serializing_if = "Option::is_none")]
    pub index_file_path: Option<String>,
    #[serde(rename = "DashDocSetFallbackURL", skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
}

impl InfoPlist {
    fn new(name: &str, index_page: Option<String>, fallback_url: Option<String>) -> Self {
        Self {
            identifier: name.to_string(),
            name: name.to_string(),
            platform_family: name.to_lowercase(),
            family: DOCSET_FAMILY.to_string(),
            is_dash_docset: true,
            index_file_path: index_page,
            fallback_url,
        }
    }
}

/// A freshly scaffolded docset: the copied documentation tree and the open
/// search-index store.
pub(crate) struct Docset {
    pub documents: PathBuf,
    pub index: SearchIndex,
}

/// Create the bundle skeleton: copy the source tree into
/// `Contents/Resources/Documents`, create an empty search index and write
/// the manifest. The source is left untouched.
pub(crate) async fn prepare_docset(args: &ConvertArgs, paths: &DocsetPaths) -> Result<Docset> {
    let contents = paths.destination.join("Contents");
    let resources = contents.join("Resources");
    let documents = resources.join("Documents");
    std::fs::create_dir_all(&resources)
        .with_context(|| format!("Failed to create docset skeleton: {}", resources.display()))?;

    copy_tree(&paths.source, &documents)?;

    let index = SearchIndex::create(&resources.join("docSet.dsidx")).await?;

    let manifest = InfoPlist::new(
        &paths.name,
        args.index_page.clone(),
        args.fallback_url.clone(),
    );
    let manifest_path = contents.join("Info.plist");
    if let Err(err) = plist::to_file_xml(&manifest_path, &manifest) {
        // The store handle must not outlive a failed preparation.
        index.close().await;
        return Err(err)
            .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()));
    }

    Ok(Docset { documents, index })
}

fn copy_tree(source: &Path, target: &Path) -> Result<()> {
    for file in WalkDir::new(source) {
        let file = file.with_context(|| format!("Failed to walk source: {}", source.display()))?;
        let relative = file
            .path()
            .strip_prefix(source)
            .context("walked outside the source tree")?;
        let destination = target.join(relative);
        if file.file_type().is_dir() {
            std::fs::create_dir_all(&destination).with_context(|| {
                format!("Failed to create directory: {}", destination.display())
            })?;
        } else {
            std::fs::copy(file.path(), &destination)
                .with_context(|| format!("Failed to copy: {}", file.path().display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docset_paths(source: &Path, destination: &Path) -> DocsetPaths {
        DocsetPaths {
            source: source.to_path_buf(),
            name: "foo".to_string(),
            destination: destination.to_path_buf(),
        }
    }

    fn read_manifest(destination: &Path) -> plist::Dictionary {
        plist::Value::from_file(destination.join("Contents").join("Info.plist"))
            .unwrap()
            .into_dictionary()
            .unwrap()
    }

    #[tokio::test]
    async fn scaffolds_layout_and_copies_source() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("docs");
        std::fs::create_dir_all(source.join("api")).unwrap();
        std::fs::write(source.join("index.html"), "<html></html>").unwrap();
        std::fs::write(source.join("api").join("foo.html"), "<html></html>").unwrap();
        let destination = tmp.path().join("foo.docset");

        let args = ConvertArgs::default();
        let docset = prepare_docset(&args, &docset_paths(&source, &destination))
            .await
            .unwrap();

        assert_eq!(
            docset.documents,
            destination.join("Contents/Resources/Documents")
        );
        assert!(docset.documents.join("index.html").is_file());
        assert!(docset.documents.join("api/foo.html").is_file());
        // Copy, not move.
        assert!(source.join("index.html").is_file());
        assert_eq!(docset.index.count().await.unwrap(), 0);
        docset.index.close().await;
    }

    #[tokio::test]
    async fn writes_expected_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("docs");
        std::fs::create_dir(&source).unwrap();
        let destination = tmp.path().join("foo.docset");

        let args = ConvertArgs::default();
        let docset = prepare_docset(&args, &docset_paths(&source, &destination))
            .await
            .unwrap();
        docset.index.close().await;

        let manifest = read_manifest(&destination);
        assert_eq!(manifest.len(), 5);
        assert_eq!(
            manifest.get("CFBundleIdentifier").unwrap().as_string(),
            Some("foo")
        );
        assert_eq!(manifest.get("CFBundleName").unwrap().as_string(), Some("foo"));
        assert_eq!(
            manifest.get("DocSetPlatformFamily").unwrap().as_string(),
            Some("foo")
        );
        assert_eq!(
            manifest.get("DashDocSetFamily").unwrap().as_string(),
            Some("python")
        );
        assert_eq!(
            manifest.get("isDashDocset").unwrap().as_boolean(),
            Some(true)
        );
    }

    #[tokio::test]
    async fn manifest_write_failure_leaves_a_consistent_store() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("docs");
        std::fs::create_dir(&source).unwrap();
        let destination = tmp.path().join("foo.docset");
        // A directory squatting on the manifest path makes the plist
        // write fail after the store was created.
        std::fs::create_dir_all(destination.join("Contents").join("Info.plist")).unwrap();

        let args = ConvertArgs::default();
        let err = prepare_docset(&args, &docset_paths(&source, &destination)).await;
        assert!(err.is_err());

        // The store was flushed on the error path and reopens cleanly.
        let store =
            crate::index::SearchIndex::open(&destination.join("Contents/Resources/docSet.dsidx"))
                .await
                .unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
        store.close().await;
    }

    #[tokio::test]
    async fn index_page_and_fallback_url_land_in_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tmp.path().join("docs");
        std::fs::create_dir(&source).unwrap();
        let destination = tmp.path().join("foo.docset");

        let args = ConvertArgs {
            index_page: Some("foo.html".to_string()),
            fallback_url: Some("https://example.org/docs/".to_string()),
            ..ConvertArgs::default()
        };
        let docset = prepare_docset(&args, &docset_paths(&source, &destination))
            .await
            .unwrap();
        docset.index.close().await;

        let manifest = read_manifest(&destination);
        assert_eq!(
            manifest.get("dashIndexFilePath").unwrap().as_string(),
            Some("foo.html")
        );
        assert_eq!(
            manifest.get("DashDocSetFallbackURL").unwrap().as_string(),
            Some("https://example.org/docs/")
        );
    }
}
