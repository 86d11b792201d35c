mod brokers;
mod cli;
mod error;
mod location;
mod log_level;
mod previous_args;

pub use self::brokers::*;
pub use self::cli::*;
pub use self::error::*;
pub use self::location::*;
pub use self::log_level::*;
pub use self::previous_args::*;

pub use camino::Utf8Path as Path;
pub use camino::Utf8PathBuf as PathBuf;
