//! Tiny argument parser for the CLI.
//! Knows flags (`-v`, `--verbose`) and options that take a value
//! (`-o out`, `-o=out`, `--output out`, `--output=out`).

use std::ffi::{OsStr, OsString};
use std::process::exit;
use std::vec::IntoIter;

pub struct Args {
    pub subcommand: &'static str,
    pub free_args: Vec<OsString>,
    pub opt_args: Vec<(&'static str, OsString)>,
    pub flags: Vec<&'static str>,
}

impl Args {
    pub fn new() -> Args {
        Args {
            subcommand: "",
            free_args: vec![],
            opt_args: vec![],
            flags: vec![],
        }
    }

    pub fn get_opt(&self, long: &'static str) -> Option<&OsStr> {
        self.opt_args.iter().find(|p| p.0 == long).map(|p| p.1.as_os_str())
    }
}

pub struct Opt {
    pub short: &'static str,
    pub long: &'static str,
    pub takes_value: bool,
    pub help: &'static str,
}

pub fn parse_opts(argv: &mut IntoIter<OsString>, args: &mut Args, opts: &[&Opt]) {
    while let Some(os_arg) = argv.next() {
        let arg = match os_arg.to_str() {
            Some(s) => s.to_string(),
            None => {
                args.free_args.push(os_arg);
                continue;
            }
        };

        // "name" in --name/-n, "value" in --name=value/-n=value
        let (name, inline_value, is_long);
        if arg.starts_with("--") {
            is_long = true;
            match arg[2..].find('=') {
                Some(i) => {
                    name = arg[2..2 + i].to_string();
                    inline_value = Some(arg[2 + i + 1..].to_string());
                }
                None => {
                    name = arg[2..].to_string();
                    inline_value = None;
                }
            }
        } else if arg.starts_with("-") && arg.len() > 1 {
            is_long = false;
            match arg[1..].find('=') {
                Some(i) => {
                    name = arg[1..1 + i].to_string();
                    inline_value = Some(arg[1 + i + 1..].to_string());
                }
                None => {
                    name = arg[1..].to_string();
                    inline_value = None;
                }
            }
        } else {
            args.free_args.push(os_arg);
            continue;
        }

        let opt = opts.iter().find(|opt| {
            match is_long {
                true => name == opt.long,
                false => !opt.short.is_empty() && name == opt.short,
            }
        });
        let opt = match opt {
            Some(opt) => opt,
            None => {
                error!("don't understand option {}{}",
                    if is_long { "--" } else { "-" },
                    name,
                );
                suggest_help_and_exit();
            }
        };

        if opt.takes_value {
            let value: OsString = match inline_value {
                Some(s) => s.into(),
                None => {
                    match argv.next() {
                        Some(s) => s,
                        None => {
                            error!("expected a value after --{}", opt.long);
                            suggest_help_and_exit();
                        }
                    }
                }
            };
            if args.get_opt(opt.long).is_some() {
                error!("you already passed --{}", opt.long);
                suggest_help_and_exit();
            }
            args.opt_args.push((opt.long, value));
        } else {
            if inline_value.is_some() {
                error!("flag --{} doesn't take a value", opt.long);
                suggest_help_and_exit();
            }
            args.flags.push(opt.long);
        }
    }
}

pub fn suggest_help_and_exit() -> ! {
    info!("Pass --help if you need help.");
    exit(1)
}
