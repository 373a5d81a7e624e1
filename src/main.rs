pub mod args;
pub mod dash;
pub mod docset;
pub mod error;
pub mod index;
pub mod logging;
pub mod parsers;
pub mod paths;
pub mod reference;

use {
    crate::{
        args::{ClapArgumentLoader, Command, ConvertArgs, ManualFormat},
        docset::Docset,
        error::Error,
        parsers::DocType,
    },
    anyhow::Context,
    tracing::info,
};

#[tokio::main]
async fn main() {
    if let Err(err) = try_main().await {
        // Argument-level errors go to stdout for the user; everything else
        // is reported on stderr. Progress stays on the log pipeline.
        if err.is_usage() {
            println!("{err}");
        } else {
            eprintln!("{err}");
        }
        std::process::exit(err.exit_code());
    }
}

async fn try_main() -> Result<(), Error> {
    let cmd = ClapArgumentLoader::load()?;

    match cmd.command {
        | Command::Manual { path, format } => {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            match format {
                | ManualFormat::Manpages => reference::build_manpages(&path)?,
                | ManualFormat::Markdown => reference::build_markdown(&path)?,
            }
            Ok(())
        },
        | Command::Autocomplete { path, shell } => {
            std::fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            reference::build_shell_completion(&path, &shell)?;
            Ok(())
        },
        | Command::Convert(convert) => {
            let level = logging::determine_level(convert.verbose, convert.quiet)?;
            logging::init(level)?;
            let doctypes = parsers::default_doctypes();
            run(&convert, &doctypes, &dash::Dash).await
        },
    }
}

/// The whole conversion: resolve paths, detect the flavor, scaffold the
/// bundle, stream parsed entries into the index, enrich, hand off to the
/// viewer.
pub(crate) async fn run(
    args: &ConvertArgs,
    doctypes: &[Box<dyn DocType>],
    viewer: &dyn dash::Viewer,
) -> Result<(), Error> {
    let paths = paths::setup_paths(args)?;
    let doctype = parsers::get_doctype(doctypes, &paths.source)
        .ok_or_else(|| Error::UnsupportedSource(paths.source.clone()))?;

    info!(
        "Converting {} docs from \"{}\" to \"{}\".",
        doctype.name(),
        paths.source.display(),
        paths
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    let docset = docset::prepare_docset(args, &paths).await?;

    info!("Parsing HTML...");
    let written = write_index(doctype, &docset).await;
    // The store must be flushed on every exit path, including a failed
    // parse, so the bundle never ships a corrupt index.
    docset.index.close().await;
    let count = written?;
    info!("Added {} index entries.", count);

    info!("Adding table of contents meta data...");
    doctype.patch_toc(&docset.documents)?;

    if args.add_to_dash || args.use_default_location {
        dash::add_to_dash(viewer, &paths.destination, args.icon.as_deref()).await?;
    }
    Ok(())
}

async fn write_index(doctype: &dyn DocType, docset: &Docset) -> Result<u64, Error> {
    let mut count = 0;
    for entry in doctype.entries(&docset.documents)? {
        docset.index.insert(&entry?).await?;
        count += 1;
    }
    Ok(count)
}
