use std::process;

use clap::Parser;

use regex_suite::cli::Args;

fn main() {
    let args = Args::parse();
    match regex_suite::run(args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(2);
        }
    }
}
