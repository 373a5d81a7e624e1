use {
    crate::{args::ConvertArgs, error::Error},
    anyhow::Context,
    std::path::{Path, PathBuf},
};

/// Where docsets land when the user asks for the default install location.
/// Always fully expanded; never contains a home shorthand.
pub(crate) fn default_docset_path() -> Result<PathBuf, Error> {
    let home = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine the home directory"))?;
    Ok(home
        .join("Library")
        .join("Application Support")
        .join("doc2dash")
        .join("DocSets"))
}

/// Resolved locations for one conversion run.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct DocsetPaths {
    pub source: PathBuf,
    /// Logical docset name, without the `.docset` suffix.
    pub name: String,
    /// Full path of the `<name>.docset` bundle directory.
    pub destination: PathBuf,
}

/// Validate the source, derive the docset name and compute the destination
/// bundle path. Removes a pre-existing destination when `force` is set;
/// fails otherwise.
pub(crate) fn setup_paths(args: &ConvertArgs) -> Result<DocsetPaths, Error> {
    if !args.source.exists() {
        return Err(Error::NotFound(args.source.clone()));
    }
    if !args.source.is_dir() {
        return Err(Error::NotADirectory(args.source.clone()));
    }

    let name = derive_name(args)?;

    let base = if args.use_default_location {
        default_docset_path()?
    } else {
        match &args.destination {
            | Some(dest) => dest.clone(),
            | None => PathBuf::from("."),
        }
    };
    let destination = base.join(format!("{}.docset", name));

    if destination.exists() {
        if !args.force {
            return Err(Error::AlreadyExists(destination));
        }
        std::fs::remove_dir_all(&destination)
            .with_context(|| format!("Failed to remove existing docset: {}", destination.display()))?;
    }

    Ok(DocsetPaths {
        source: args.source.clone(),
        name,
        destination,
    })
}

fn derive_name(args: &ConvertArgs) -> Result<String, Error> {
    // file_name() already ignores a trailing separator on the source path.
    let raw = match &args.name {
        | Some(name) => name.clone(),
        | None => basename(&args.source)?,
    };
    Ok(raw.strip_suffix(".docset").unwrap_or(&raw).to_string())
}

fn basename(path: &Path) -> Result<String, Error> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Cannot derive a docset name from: {}", path.display()))?;
    Ok(name.to_string_lossy().into_owned())
}
