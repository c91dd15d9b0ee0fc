// CLI binary entry point for oggdemux
//
// This is the main entry point for the oggdemux command-line tool.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use cli::commands::{command_packets, command_pages, command_tags, load_stream_config};
use cli::{Commands, Config, OutputFormatter};

fn main() {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let formatter = OutputFormatter::new(config.format, config.quiet);

    let stream_config = match load_stream_config(config.config.as_deref(), config.verify_crc) {
        Ok(stream_config) => stream_config,
        Err(e) => {
            formatter.print_error(&format!("{:#}", e));
            process::exit(2);
        }
    };

    let ok = match &config.command {
        Commands::Pages { files } => command_pages(files, &stream_config, &formatter),
        Commands::Packets { files, limit } => {
            command_packets(files, *limit, &stream_config, &formatter)
        }
        Commands::Tags { files } => command_tags(files, &stream_config, &formatter),
    };

    if !ok {
        process::exit(1);
    }
}
