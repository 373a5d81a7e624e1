use {
    anyhow::{Context, Result},
    std::path::Path,
};

/// Hand-off contract to the viewer application. The real launcher and a
/// test stub satisfy the same contract, so the conversion flow can be
/// exercised without spawning anything.
#[async_trait::async_trait(?Send)]
pub(crate) trait Viewer {
    async fn open(&self, destination: &Path) -> Result<()>;
}

/// The real viewer hand-off: `open -a dash <docset>`.
pub(crate) struct Dash;

#[async_trait::async_trait(?Send)]
impl Viewer for Dash {
    async fn open(&self, destination: &Path) -> Result<()> {
        let status = tokio::process::Command::new("open")
            .arg("-a")
            .arg("dash")
            .arg(destination)
            .status()
            .await
            .context("Failed to launch the docset viewer")?;
        if !status.success() {
            anyhow::bail!("Viewer open command failed with {}", status);
        }
        Ok(())
    }
}

/// Drop the icon into the bundle and hand the finished docset over.
pub(crate) async fn add_to_dash(
    viewer: &dyn Viewer,
    destination: &Path,
    icon: Option<&Path>,
) -> Result<()> {
    if let Some(icon) = icon {
        copy_icon(icon, destination)?;
    }
    tracing::info!("Adding to dash...");
    viewer.open(destination).await
}

pub(crate) fn copy_icon(icon: &Path, destination: &Path) -> Result<()> {
    let target = destination.join("icon.png");
    std::fs::copy(icon, &target)
        .with_context(|| format!("Failed to copy icon to: {}", target.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_lands_in_bundle_root() {
        let tmp = tempfile::tempdir().unwrap();
        let icon = tmp.path().join("qux.png");
        std::fs::write(&icon, b"\x89PNG\r\n").unwrap();
        let bundle = tmp.path().join("bar.docset");
        std::fs::create_dir(&bundle).unwrap();

        copy_icon(&icon, &bundle).unwrap();
        assert_eq!(
            std::fs::read(bundle.join("icon.png")).unwrap(),
            b"\x89PNG\r\n"
        );
    }

    #[test]
    fn missing_icon_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(copy_icon(&tmp.path().join("nope.png"), tmp.path()).is_err());
    }
}
