#![forbid(unsafe_code)]
#![deny(clippy::mem_forget)]

use anyhow::Context;
use clap::Parser;
use ngsi::cli::Opt;
use ngsi::command::BuildCommand;
use ngsi::command::BuildContext;
use ngsi_config::log_init;
use ngsi_config::NgsiConfigLocation;

fn main() -> anyhow::Result<()> {
    let opt = Opt::parse();

    let config_location = NgsiConfigLocation::from_custom_root(&opt.config_dir);
    log_init("ngsi", &opt.log_args, &config_location)?;

    let build_context = BuildContext { config_location };
    let cmd = opt.command.build_command(build_context)?;

    cmd.execute()
        .with_context(|| format!("failed to {}", cmd.description()))
}
