//! Command line parsing for the HLS driver.
use argh::FromArgs;
use hls_utils::OutputFile;
use std::path::PathBuf;

#[derive(FromArgs)]
/// Run analyses over an HLS program and report its channel topology.
pub struct Opts {
    /// input program in JSON. Reads from stdin when omitted.
    #[argh(positional)]
    pub file: Option<PathBuf>,

    /// output file, "-" for stdout
    #[argh(option, short = 'o', default = "OutputFile::Stdout")]
    pub output: OutputFile,

    /// run this pass or alias. Can be repeated. Runs "all" by default.
    #[argh(option, short = 'p', long = "pass")]
    pub pass: Vec<String>,

    /// disable pass or alias. Can be repeated.
    #[argh(option, short = 'd', long = "disable-pass")]
    pub disable_pass: Vec<String>,

    /// print the transformed program instead of the channel report
    #[argh(switch, long = "emit-ir")]
    pub emit_ir: bool,

    /// list all known passes and aliases
    #[argh(switch, long = "list-passes")]
    pub list_passes: bool,

    /// describe a single pass or alias
    #[argh(option, long = "describe-pass")]
    pub describe_pass: Option<String>,

    /// logging level
    #[argh(option, long = "log-level", default = "log::LevelFilter::Warn")]
    pub log_level: log::LevelFilter,
}

impl Opts {
    /// Parse the command line. Without any `-p` flags the `all` alias runs.
    pub fn get_opts() -> Opts {
        let mut opts: Opts = argh::from_env();
        if opts.pass.is_empty() {
            opts.pass.push("all".to_string());
        }
        opts
    }
}
