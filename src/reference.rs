use {
    anyhow::{Context, Result},
    std::path::Path,
};

pub(crate) fn build_manpages(path: &Path) -> Result<()> {
    clap_mangen::generate_to(crate::args::ClapArgumentLoader::root_command(), path)
        .with_context(|| format!("Failed to render manpages to: {}", path.display()))?;
    Ok(())
}

pub(crate) fn build_markdown(path: &Path) -> Result<()> {
    let markdown =
        clap_markdown::help_markdown_command(&crate::args::ClapArgumentLoader::root_command());
    let out = path.join("doc2dash.md");
    std::fs::write(&out, markdown)
        .with_context(|| format!("Failed to write manual to: {}", out.display()))?;
    Ok(())
}

pub(crate) fn build_shell_completion(path: &Path, shell: &clap_complete::Shell) -> Result<()> {
    clap_complete::generate_to(
        *shell,
        &mut crate::args::ClapArgumentLoader::root_command(),
        "doc2dash",
        path,
    )
    .with_context(|| format!("Failed to render completions to: {}", path.display()))?;
    Ok(())
}
