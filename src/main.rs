mod app;
mod cli;
mod config;
mod consts;
mod core;
mod error;
mod output;
mod store;
mod timer;
mod utils;

use clap::Parser;

use cli::Cli;
use config::Config;
use utils::set_debug;

fn main() {
    let cli = Cli::parse();

    // JSON output stays machine-readable: no config chatter on stderr
    let config = if cli.json {
        Config::load_quiet()
    } else {
        Config::load()
    };
    let cli = cli.with_config(&config);
    set_debug(cli.debug);

    if let Err(e) = app::run(&cli, &config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
