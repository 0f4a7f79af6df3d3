use clap::Parser;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    match cli.run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("retrycmd error: {:#}", err);
            std::process::exit(1);
        }
    }
}
