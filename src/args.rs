use {
    crate::error::Error,
    clap::Arg,
    std::{path::PathBuf, str::FromStr},
};

#[derive(Debug)]
pub(crate) enum ManualFormat {
    Manpages,
    Markdown,
}

/// Resolved configuration for a conversion run. Immutable after parsing;
/// every downstream step reads from it.
#[derive(Debug, Default)]
pub(crate) struct ConvertArgs {
    pub source: PathBuf,
    pub name: Option<String>,
    pub destination: Option<PathBuf>,
    pub force: bool,
    pub add_to_dash: bool,
    pub use_default_location: bool,
    pub icon: Option<PathBuf>,
    pub index_page: Option<String>,
    pub fallback_url: Option<String>,
    pub quiet: bool,
    pub verbose: bool,
}

#[derive(Debug)]
pub(crate) enum Command {
    Convert(ConvertArgs),
    Manual { path: PathBuf, format: ManualFormat },
    Autocomplete { path: PathBuf, shell: clap_complete::Shell },
}

#[derive(Debug)]
pub(crate) struct CallArgs {
    pub command: Command,
}

impl CallArgs {
    /// Argument-level checks that must run before any filesystem mutation.
    /// Failures here are user errors and are reported on stdout.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        match &self.command {
            | Command::Convert(args) => {
                if let Some(icon) = &args.icon {
                    let is_png = icon
                        .extension()
                        .map(|ext| ext.eq_ignore_ascii_case("png"))
                        .unwrap_or(false);
                    if !is_png {
                        return Err(Error::Usage("Please supply a PNG icon.".to_string()));
                    }
                }
                if let Some(index_page) = &args.index_page {
                    if !PathBuf::from(index_page).is_file() {
                        return Err(Error::Usage(format!(
                            "Index file {} does not exists.",
                            index_page
                        )));
                    }
                }
                Ok(())
            },
            | _ => Ok(()),
        }
    }
}

pub(crate) struct ClapArgumentLoader {}

impl ClapArgumentLoader {
    pub(crate) fn root_command() -> clap::Command {
        clap::Command::new("doc2dash")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Converts API documentation into docsets.")
            .propagate_version(true)
            .subcommand_negates_reqs(true)
            .arg(
                Arg::new("source")
                    .required(true)
                    .help("Source directory containing the documentation."),
            )
            .args([
                Arg::new("name")
                    .short('n')
                    .long("name")
                    .help("Name the docset explicitly instead of deriving it from SOURCE."),
                Arg::new("destination")
                    .short('d')
                    .long("destination")
                    .help("Destination directory for the docset (default: current directory)."),
                Arg::new("force")
                    .short('f')
                    .long("force")
                    .num_args(0)
                    .help("Overwrite the destination docset if it exists."),
                Arg::new("add-to-dash")
                    .short('a')
                    .long("add-to-dash")
                    .num_args(0)
                    .help("Automatically add the resulting docset to dash."),
                Arg::new("add-to-global")
                    .short('A')
                    .num_args(0)
                    .help("Create the docset in the default install location."),
                Arg::new("icon")
                    .short('i')
                    .long("icon")
                    .help("Add a PNG icon to the docset."),
                Arg::new("index-page")
                    .short('I')
                    .long("index-page")
                    .help("Set the docset index page."),
                Arg::new("fallback-url")
                    .short('u')
                    .long("online-redirect-url")
                    .help("Online URL the viewer may redirect to for this docset."),
                Arg::new("quiet")
                    .short('q')
                    .long("quiet")
                    .num_args(0)
                    .help("Limit output to errors."),
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .num_args(0)
                    .help("Be verbose."),
            ])
            .subcommand(
                clap::Command::new("man")
                    .about("Renders the manual.")
                    .arg(clap::Arg::new("out").short('o').long("out").required(true))
                    .arg(
                        clap::Arg::new("format")
                            .short('f')
                            .long("format")
                            .value_parser(["manpages", "markdown"])
                            .required(true),
                    ),
            )
            .subcommand(
                clap::Command::new("autocomplete")
                    .about("Renders shell completion scripts.")
                    .arg(clap::Arg::new("out").short('o').long("out").required(true))
                    .arg(
                        clap::Arg::new("shell")
                            .short('s')
                            .long("shell")
                            .value_parser(["bash", "zsh", "fish", "elvish", "powershell"])
                            .required(true),
                    ),
            )
    }

    pub(crate) fn load() -> Result<CallArgs, Error> {
        let matches = Self::root_command().get_matches();
        let callargs = Self::from_matches(&matches)?;
        callargs.validate()?;
        Ok(callargs)
    }

    fn from_matches(matches: &clap::ArgMatches) -> Result<CallArgs, Error> {
        let cmd = if let Some(subc) = matches.subcommand_matches("man") {
            Command::Manual {
                path: subc
                    .get_one::<String>("out")
                    .map(PathBuf::from)
                    .ok_or_else(missing_arg)?,
                format: match subc.get_one::<String>("format").map(|v| v.as_str()) {
                    | Some("manpages") => ManualFormat::Manpages,
                    | Some("markdown") => ManualFormat::Markdown,
                    | _ => {
                        return Err(Error::Usage(
                            "argument \"format\": unknown format".to_string(),
                        ));
                    },
                },
            }
        } else if let Some(subc) = matches.subcommand_matches("autocomplete") {
            Command::Autocomplete {
                path: subc
                    .get_one::<String>("out")
                    .map(PathBuf::from)
                    .ok_or_else(missing_arg)?,
                shell: subc
                    .get_one::<String>("shell")
                    .and_then(|s| clap_complete::Shell::from_str(s).ok())
                    .ok_or_else(missing_arg)?,
            }
        } else {
            Command::Convert(ConvertArgs {
                source: matches
                    .get_one::<String>("source")
                    .map(PathBuf::from)
                    .ok_or_else(missing_arg)?,
                name: matches.get_one::<String>("name").cloned(),
                destination: matches.get_one::<String>("destination").map(PathBuf::from),
                force: matches.get_flag("force"),
                add_to_dash: matches.get_flag("add-to-dash"),
                use_default_location: matches.get_flag("add-to-global"),
                icon: matches.get_one::<String>("icon").map(PathBuf::from),
                index_page: matches.get_one::<String>("index-page").cloned(),
                fallback_url: matches.get_one::<String>("fallback-url").cloned(),
                quiet: matches.get_flag("quiet"),
                verbose: matches.get_flag("verbose"),
            })
        };

        Ok(CallArgs { command: cmd })
    }
}

fn missing_arg() -> Error {
    Error::Usage("missing required argument".to_string())
}
