// CLI module for oggdemux
//
// Command-line inspection of Ogg/Vorbis files. Only compiled into the binary.

pub mod commands;
pub mod config;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;
