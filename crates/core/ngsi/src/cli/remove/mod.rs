pub use self::cli::*;
pub use self::command::*;

mod cli;
mod command;
mod strategies;
