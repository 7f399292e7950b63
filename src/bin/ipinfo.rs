//! ipinfo inspector binary

use anyhow::{Context, Result};
use clap::Parser;
use makeip::api::{extract_logo, extract_logo_png};
use makeip::exit_codes::{self, EXIT_ERROR, EXIT_PANIC, EXIT_SUCCESS};
use makeip::inspect_bootstrap_file;
use makeip::ip::BootstrapInfo;
use std::{env, panic, path::PathBuf, process};

const VERSION: &str = makeip::version::VERSION;

#[derive(Parser, Debug)]
#[command(name = "ipinfo", version = VERSION, about = "Inspect a Dreamcast IP.BIN bootstrap")]
struct Args {
    /// Bootstrap image to inspect
    ip_bin: PathBuf,

    /// Print the report as JSON
    #[arg(long, conflicts_with = "text")]
    json: bool,

    /// Print the fields as an ip.txt text template
    #[arg(long)]
    text: bool,

    /// Save the embedded MR logo verbatim
    #[arg(long, value_name = "MR_OUT")]
    extract_logo: Option<PathBuf>,

    /// Decode the embedded MR logo and save it as PNG
    #[arg(long, value_name = "PNG_OUT")]
    extract_png: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    force: bool,

    /// Log level (trace, debug, info, warn, error, json[:level])
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    panic::set_hook(Box::new(|panic_info| {
        eprintln!("PANIC: {}", panic_info);
        process::exit(EXIT_PANIC);
    }));

    match panic::catch_unwind(run) {
        Ok(exit_code) => process::exit(exit_code),
        Err(_) => {
            eprintln!("Fatal: Unhandled panic in ipinfo");
            process::exit(EXIT_PANIC);
        }
    }
}

fn run() -> i32 {
    if env::args().nth(1).as_deref() == Some("--version") {
        println!("ipinfo {}", makeip::version::full_version());
        return EXIT_SUCCESS;
    }

    let args = Args::parse();
    makeip::logger::init(args.log_level.as_deref(), false);

    match inspect(&args) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_ERROR,
        Err(e) => {
            eprintln!("ipinfo: {e:#}");
            exit_codes::for_error(&e)
        }
    }
}

/// Report on the image; returns whether its checksum is valid
fn inspect(args: &Args) -> Result<bool> {
    let info = inspect_bootstrap_file(&args.ip_bin)
        .with_context(|| format!("reading {:?}", args.ip_bin))?;

    if args.json {
        let json = serde_json::to_string_pretty(&info).context("encoding report as JSON")?;
        println!("{}", json);
    } else if args.text {
        print!("{}", info.registry().to_text());
    } else {
        show_info(&args.ip_bin, &info);
    }

    if let Some(out) = &args.extract_logo {
        extract_logo(&args.ip_bin, out, args.force)
            .with_context(|| format!("extracting logo to {:?}", out))?;
        eprintln!("💾 logo saved to {:?}", out);
    }
    if let Some(out) = &args.extract_png {
        extract_logo_png(&args.ip_bin, out, args.force)
            .with_context(|| format!("extracting logo as PNG to {:?}", out))?;
        eprintln!("💾 logo saved to {:?}", out);
    }

    Ok(info.checksum_valid)
}

fn show_info(path: &std::path::Path, info: &BootstrapInfo) {
    println!("💿 Bootstrap: {}", path.display());
    println!();
    println!("📋 Header:");
    let width = info.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
    for field in &info.fields {
        println!("  {:<width$}  {}", field.name, field.value);
    }
    println!();
    println!("🔒 Checksum:");
    println!("  Stored: {}", info.stored_checksum);
    println!("  Computed: {}", info.computed_checksum);
    println!("  Valid: {}", if info.checksum_valid { "✓" } else { "✗" });
    println!();
    println!("🖼️  Logo:");
    match &info.logo {
        Some(logo) => {
            println!("  Size: {}x{}, {} colors", logo.width, logo.height, logo.colors);
            println!(
                "  Bytes: {}{}",
                logo.size,
                if logo.oversize { " (oversize)" } else { "" }
            );
        }
        None => println!("  none"),
    }
}
