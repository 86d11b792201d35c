#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfigArgs {
    /// Turn-on the DEBUG log level.
    ///
    /// If off only reports ERROR and WARN, if on also reports INFO and DEBUG
    #[clap(long, global = true)]
    pub debug: bool,

    /// Configures the logging level.
    ///
    /// One of error/warn/info/debug/trace.
    /// Logs with verbosity lower or equal to the selected level will be printed,
    /// i.e. warn prints ERROR and WARN logs and trace prints logs of all levels.
    ///
    /// Overrides `--debug`
    #[clap(long, global = true)]
    pub log_level: Option<tracing::Level>,
}
