use clap::Parser;

/// This program tabulates and maps polling places for Australian federal elections.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The JSON configuration describing the input files and the divisions to
    /// process. For more information about the file format, read the documentation of the
    /// configuration module.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (division name or empty) If specified, only the named division from the configuration
    /// is processed.
    #[clap(short, long, value_parser)]
    pub division: Option<String>,

    /// (directory path or empty) If specified, the maps and summaries are written to the given
    /// directory. Setting this option overrides the path that may be specified in the
    /// configuration file.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a primary vote summary in JSON format. If
    /// provided together with --division, boothmap will check that the tabulated summary
    /// matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If passed as an argument, computes the absentee pre-poll report for the premises listed
    /// in the configuration instead of rendering maps.
    #[clap(long, takes_value = false)]
    pub absentee_report: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
