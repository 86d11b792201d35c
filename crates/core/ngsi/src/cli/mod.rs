use crate::command::BuildCommand;
use crate::command::BuildContext;
use crate::command::Command;
use crate::NgsiError;
use ngsi_config::get_config_dir;
use ngsi_config::LogConfigArgs;
use ngsi_config::PathBuf;

mod common;
pub mod copy;
pub mod log;
pub mod remove;

#[derive(clap::Parser, Debug)]
#[clap(
    name = clap::crate_name!(),
    version = clap::crate_version!(),
    about = clap::crate_description!(),
    arg_required_else_help(true)
)]
pub struct Opt {
    /// Directory of the broker registry
    ///
    /// [env: NGSI_CONFIG_DIR, default: /etc/ngsi]
    #[clap(
        long = "config-dir",
        default_value = get_config_dir().into_string(),
        hide_env_values = true,
        hide_default_value = true,
        global = true
    )]
    pub config_dir: PathBuf,

    #[command(flatten)]
    pub log_args: LogConfigArgs,

    #[clap(subcommand)]
    pub command: NgsiOpt,
}

#[derive(clap::Subcommand, Debug)]
pub enum NgsiOpt {
    /// Copy entities from a broker to another
    ///
    /// Without --run, only the number of entities that would be copied is displayed.
    #[clap(name = "cp", visible_alias = "copy")]
    Copy(copy::CopyCli),

    /// Remove entities of a broker
    ///
    /// Without --run, only the number of entities that would be removed is displayed.
    #[clap(name = "rm", visible_alias = "remove")]
    Remove(remove::RemoveCli),
}

impl BuildCommand for NgsiOpt {
    fn build_command(self, context: BuildContext) -> Result<Box<dyn Command>, NgsiError> {
        match self {
            NgsiOpt::Copy(opt) => opt.build_command(context),
            NgsiOpt::Remove(opt) => opt.build_command(context),
        }
    }
}
