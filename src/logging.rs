use {crate::error::Error, anyhow::Context, tracing::Level};

/// Map the verbosity flags to a log level. Checked before any filesystem
/// mutation so a conflicting invocation never leaves half-created state.
pub(crate) fn determine_level(verbose: bool, quiet: bool) -> Result<Level, Error> {
    match (verbose, quiet) {
        | (true, true) => Err(Error::Usage(
            "Supply either --quiet or --verbose, not both.".to_string(),
        )),
        | (true, false) => Ok(Level::DEBUG),
        | (false, true) => Ok(Level::ERROR),
        | (false, false) => Ok(Level::INFO),
    }
}

/// Install the run-scoped subscriber. Progress lines are bare messages so
/// they read like plain console output.
pub(crate) fn init(level: Level) -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_level(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install the log subscriber")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_info() {
        assert_eq!(determine_level(false, false).unwrap(), Level::INFO);
    }

    #[test]
    fn verbose_is_debug() {
        assert_eq!(determine_level(true, false).unwrap(), Level::DEBUG);
    }

    #[test]
    fn quiet_is_error() {
        assert_eq!(determine_level(false, true).unwrap(), Level::ERROR);
    }

    #[test]
    fn both_flags_fail() {
        let err = determine_level(true, true).unwrap_err();
        assert!(err.is_usage());
        assert_ne!(err.exit_code(), 0);
    }
}
