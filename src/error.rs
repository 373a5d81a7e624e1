use std::path::PathBuf;

/// Failures that carry a defined process exit status. Everything else is
/// wrapped as `Other` and exits 1.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Source directory \"{}\" does not exist.", .0.display())]
    NotFound(PathBuf),
    #[error("Source \"{}\" is not a directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error("Destination \"{}\" already exists.", .0.display())]
    AlreadyExists(PathBuf),
    #[error("\"{}\" does not contain a known documentation format.", .0.display())]
    UnsupportedSource(PathBuf),
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Exit statuses follow errno conventions so scripted callers can
    /// distinguish failure classes; usage errors keep the argument-parser
    /// convention of status 2.
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            | Error::NotFound(_) => 2,          // ENOENT
            | Error::NotADirectory(_) => 20,    // ENOTDIR
            | Error::AlreadyExists(_) => 17,    // EEXIST
            | Error::UnsupportedSource(_) => 22, // EINVAL
            | Error::Usage(_) => 2,
            | Error::Other(_) => 1,
        }
    }

    pub(crate) fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_errno() {
        assert_eq!(Error::NotFound("x".into()).exit_code(), 2);
        assert_eq!(Error::NotADirectory("x".into()).exit_code(), 20);
        assert_eq!(Error::AlreadyExists("x".into()).exit_code(), 17);
        assert_eq!(Error::UnsupportedSource("x".into()).exit_code(), 22);
        assert_eq!(Error::Usage("bad".into()).exit_code(), 2);
    }
}
