//! UCI protocol front-end for vantage.

pub mod command;
pub mod error;
pub mod frontend;

pub use command::{Command, GoParams, UciOption, parse_command};
pub use error::UciError;
pub use frontend::UciFrontend;
