//! makeip builder binary

use anyhow::Context;
use clap::Parser;
use makeip::exit_codes::{self, EXIT_INVALID_ARGS, EXIT_PANIC, EXIT_SUCCESS};
use makeip::{BuildOptions, FieldKind, build_bootstrap, export_logo};
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = makeip::version::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "makeip",
    version = VERSION,
    about = "Build a Dreamcast IP.BIN bootstrap",
    after_help = "With one path it is the output IP.BIN; with two, the first is an ip.txt \
                  text template. Field options override values from the text template."
)]
struct Args {
    /// [IP_TXT] <IP_BIN>
    #[arg(value_name = "PATH", num_args = 0..=2)]
    paths: Vec<PathBuf>,

    /// Area symbols (any of J, U, E)
    #[arg(short = 'a', value_name = "AREA")]
    area_symbols: Option<String>,

    /// Boot filename
    #[arg(short = 'b', value_name = "FILE")]
    boot_filename: Option<String>,

    /// Software maker name
    #[arg(short = 'c', value_name = "NAME")]
    sw_maker: Option<String>,

    /// Release date (YYYYMMDD)
    #[arg(short = 'd', value_name = "DATE")]
    release_date: Option<String>,

    /// Version (Vx.yyy)
    #[arg(short = 'e', value_name = "VERSION")]
    game_version: Option<String>,

    /// Game title
    #[arg(short = 'g', value_name = "TITLE")]
    game_title: Option<String>,

    /// Device info (CD-ROMx/y or GD-ROMx/y)
    #[arg(short = 'i', value_name = "DEVICE")]
    device_info: Option<String>,

    /// Product number
    #[arg(short = 'n', value_name = "NUMBER")]
    product_no: Option<String>,

    /// Peripherals (five hex digits then two 0/1 flags)
    #[arg(short = 'p', value_name = "FLAGS")]
    peripherals: Option<String>,

    /// Boot logo to embed (MR or PNG)
    #[arg(short = 'l', long, value_name = "IMAGE")]
    logo: Option<PathBuf>,

    /// External 32768-byte base template (IP.TMPL)
    #[arg(short = 't', long, value_name = "IP_TMPL")]
    template: Option<PathBuf>,

    /// Write the converted logo as an MR file and stop
    #[arg(short = 'x', long, value_name = "MR_OUT", requires = "logo")]
    export_logo: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    force: bool,

    /// Report field settings and progress
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Log level (trace, debug, info, warn, error, json[:level])
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> Vec<(FieldKind, String)> {
        [
            (FieldKind::AreaSymbols, &self.area_symbols),
            (FieldKind::BootFilename, &self.boot_filename),
            (FieldKind::SwMakerName, &self.sw_maker),
            (FieldKind::ReleaseDate, &self.release_date),
            (FieldKind::Version, &self.game_version),
            (FieldKind::GameTitle, &self.game_title),
            (FieldKind::DeviceInfo, &self.device_info),
            (FieldKind::ProductNo, &self.product_no),
            (FieldKind::Peripherals, &self.peripherals),
        ]
        .into_iter()
        .filter_map(|(kind, value)| value.clone().map(|v| (kind, v)))
        .collect()
    }
}

fn main() {
    // Set up panic handler to return specific exit code
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    let result = panic::catch_unwind(run);

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in makeip");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("makeip {}", makeip::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();
    makeip::logger::init(args.log_level.as_deref(), args.verbose);

    if let Some(mr_out) = &args.export_logo {
        let Some(logo) = &args.logo else {
            eprintln!("makeip: --export-logo needs --logo");
            return EXIT_INVALID_ARGS;
        };
        let result = export_logo(logo, mr_out, args.force)
            .with_context(|| format!("exporting {:?} as MR to {:?}", logo, mr_out));
        return match result {
            Ok(_) => EXIT_SUCCESS,
            Err(e) => report(&e),
        };
    }

    let (text_template, output) = match args.paths.as_slice() {
        [output] => (None, output.clone()),
        [text, output] => (Some(text.clone()), output.clone()),
        _ => {
            eprintln!("makeip: missing output path; usage: makeip [OPTIONS] [IP_TXT] <IP_BIN>");
            return EXIT_INVALID_ARGS;
        }
    };

    let options = BuildOptions {
        text_template,
        base_template: args.template.clone(),
        logo: args.logo.clone(),
        overrides: args.overrides(),
        overwrite: args.force,
    };

    match build_bootstrap(&output, options).with_context(|| format!("building {:?}", output)) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => report(&e),
    }
}

fn report(err: &anyhow::Error) -> i32 {
    eprintln!("makeip: {err:#}");
    exit_codes::for_error(err)
}
