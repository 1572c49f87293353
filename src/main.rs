#![recursion_limit = "1024"] // for error_chain

#[macro_use]
extern crate log;
#[macro_use]
extern crate error_chain;
extern crate atty;
extern crate cgmath;
extern crate json;
extern crate smallvec;
extern crate termcolor;
extern crate time;

mod cli;
mod errors;
mod export;
mod info;
mod logger;
mod scene;

use std::process::exit;

pub static VERSION: &'static str = env!("CARGO_PKG_VERSION");

fn main() {
    logger::init(log::Level::Info);

    let args = cli::parse_cli_args();

    if args.flags.contains(&"verbose") {
        log::set_max_level(log::LevelFilter::Debug);
    }

    let res = match args.subcommand {
        "export" => export::main(&args),
        "info" => info::main(&args),
        _ => unreachable!(),
    };

    if let Err(e) = res {
        error!("{}", e);
        exit(1);
    }
}
