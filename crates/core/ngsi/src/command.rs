use crate::NgsiError;
use ngsi_config::NgsiConfig;
use ngsi_config::NgsiConfigLocation;

/// A trait to be implemented by all ngsi sub-commands.
///
/// A command is built from the command line arguments and the configuration files
/// by a [BuildCommand], which is the place to reject inconsistent arguments.
/// Executing the command is then only about talking to the brokers.
pub trait Command {
    /// Display that command to the user, telling what will be done.
    ///
    /// This description is displayed to the end user in case of an error, to give the context of that error.
    fn description(&self) -> String;

    /// Execute this command.
    ///
    /// The errors returned by this method must be as precise as possible,
    /// the command description being added by the caller.
    fn execute(&self) -> anyhow::Result<()>;

    /// Helper method to be used in the `BuildCommand` trait.
    ///
    /// The `BuildCommand::build_command()` method has to return a box around a new command.
    ///
    /// ```ignore
    /// fn build_command(self, context: BuildContext) -> Result<Box<dyn Command>, NgsiError> {
    ///     let cmd = RemoveCmd { /* ... */ };
    ///     Ok(cmd.into_boxed())
    /// }
    /// ```
    fn into_boxed(self) -> Box<dyn Command>
    where
        Self: Sized + 'static,
    {
        Box::new(self)
    }
}

/// A trait implemented by the command line options of a sub-command
pub trait BuildCommand {
    fn build_command(self, context: BuildContext) -> Result<Box<dyn Command>, NgsiError>;
}

/// The context for `BuildCommand`
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub config_location: NgsiConfigLocation,
}

impl BuildContext {
    pub fn load_config(&self) -> Result<NgsiConfig, NgsiError> {
        Ok(NgsiConfig::try_new(&self.config_location)?)
    }
}
