//! `crm` binary entry point.

use clap::Parser;
use crm_core::cli::{run, Cli};
use crm_core::logging;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.global.log_format, cli.global.verbose, cli.global.quiet);
    let code = run(&cli);
    std::process::exit(code.as_i32());
}
