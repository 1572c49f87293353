use std::env;
use std::vec::IntoIter;
use std::ffi::OsString;
use std::path::Path;
use std::process::exit;

mod parse;
use self::parse::*;
pub use self::parse::Args;


pub fn parse_cli_args() -> Args {
    let args_os: Vec<OsString> = env::args_os().collect();
    let mut argv = args_os.into_iter();
    let mut args = Args::new();

    let _exe_name = argv.next();

    let arg = match argv.next() {
        Some(x) => x,
        None => show_usage_and_exit(),
    };
    let arg = match arg.to_str() {
        Some(x) => x.to_string(),
        None => {
            error!("don't understand {:?}", arg);
            info!("use `daewright help` for help");
            exit(1);
        }
    };
    match &arg[..] {
        "e" | "export" => {
            args.subcommand = "export";
            export(&mut argv, &mut args);
        }
        "i" | "info" => {
            args.subcommand = "info";
            info(&mut argv, &mut args);
        }
        "help" => help(&mut argv),
        "-h" | "--help" => show_usage_and_exit(),
        "-V" | "--version" => version(),
        _ => {
            error!("don't understand {}", arg);
            info!("use `daewright help` for help");
            exit(1);
        }
    }

    args
}

fn show_opts_help(opts: &[&Opt]) {
    println!("  Options:");
    for opt in opts {
        if !opt.help.is_empty() {
            println!("    {}", opt.help);
        }
    }
}

static HELP_OPT: Opt = Opt {
    short: "h", long: "help", takes_value: false,
    help: "-h, --help                show help",
};
static OUTPUT_OPT: Opt = Opt {
    short: "o", long: "output", takes_value: true,
    help: "-o, --output <file>       write the .dae document here",
};
static VERBOSE_OPT: Opt = Opt {
    short: "v", long: "verbose", takes_value: false,
    help: "-v, --verbose             per-node progress output",
};


fn version() -> ! {
    println!("daewright {}", ::VERSION);
    println!("build commit: {}", include_str!(concat!(env!("OUT_DIR"), "/git-commit")));
    println!("build date: {}", include_str!(concat!(env!("OUT_DIR"), "/compile-date")));
    exit(0)
}

fn show_usage_and_exit() -> ! {
    print!(concat!(
        "\n",
        "  Usage: daewright <command> ...\n",
        "\n",
        "  Exports scene descriptions to COLLADA (.dae) documents the\n",
        "  game engine's importer understands.\n",
        "\n",
        "  Example:\n",
        "\n",
        "    # look at what a scene file contains\n",
        "    daewright info my-ship.scene.json\n",
        "    # export it\n",
        "    daewright export my-ship.scene.json -o my-ship.dae\n",
        "\n",
        "  Commands:\n",
        "\n",
        "    export         Export a scene to .dae\n",
        "    info           Display info for a scene file\n",
        "    help           Display help\n",
        "\n",
        "  Run `daewright help COMMAND` for more information on specific commands.\n",
        "\n",
    ));
    exit(0);
}

fn help(argv: &mut IntoIter<OsString>) -> ! {
    let arg = argv.next();
    let arg = arg.as_ref().and_then(|arg| arg.to_str());
    match arg {
        Some("export") => show_export_help_and_exit(),
        Some("info") => show_info_help_and_exit(),
        _ => show_usage_and_exit(),
    }
}


static EXPORT_OPTS: &'static [&'static Opt] = &[&OUTPUT_OPT, &VERBOSE_OPT, &HELP_OPT];

fn export(argv: &mut IntoIter<OsString>, args: &mut Args) {
    parse_opts(argv, args, EXPORT_OPTS);
    if args.flags.contains(&"help") { show_export_help_and_exit(); }
    check_scene_input(args);
    check_output_file(args);
}

fn show_export_help_and_exit() -> ! {
    print!(concat!(
        "\n",
        "  Usage: daewright export <scene file> -o <file.dae>\n",
        "\n",
        "  Exports the scene to a COLLADA document. Joint-name metadata\n",
        "  (nav lights, dock paths, segments) is encoded the way the engine\n",
        "  expects it.\n",
        "\n",
    ));
    show_opts_help(EXPORT_OPTS);
    println!();
    exit(0);
}


static INFO_OPTS: &'static [&'static Opt] = &[&VERBOSE_OPT, &HELP_OPT];

fn info(argv: &mut IntoIter<OsString>, args: &mut Args) {
    parse_opts(argv, args, INFO_OPTS);
    if args.flags.contains(&"help") { show_info_help_and_exit(); }
    check_scene_input(args);
}

fn show_info_help_and_exit() -> ! {
    print!(concat!(
        "\n",
        "  Usage: daewright info <scene file>\n",
        "\n",
        "  Display the objects, meshes, materials and textures in the\n",
        "  given scene file.\n",
        "\n",
    ));
    show_opts_help(INFO_OPTS);
    println!();
    exit(0);
}


fn check_scene_input(args: &Args) {
    if args.free_args.is_empty() {
        error!("give me a scene file");
        exit(1);
    }
    if args.free_args.len() > 1 {
        error!("too many input files! I only need one");
        exit(1);
    }
}

fn check_output_file(args: &Args) {
    let output = args.get_opt("output");
    if output.is_none() {
        error!("where does the .dae go? Pass it with --output");
        exit(1);
    }
    let output = output.unwrap();
    if Path::new(output).exists() {
        error!("output file already exists, choose a different one");
        exit(1);
    }
}
