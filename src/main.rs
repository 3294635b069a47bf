use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::info;
use ogkit::optimize::{self, OptimizeConfig};
use ogkit::{Backend, RenderJob, Viewport};

#[derive(Parser)]
#[command(name = "ogkit", version, about = "Render the site's OG image and optimize its image assets")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render an HTML template to a fixed-size PNG
    Render(RenderArgs),
    /// Downscale and recompress PNG/JPEG files in place
    Optimize(OptimizeArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// HTML template to render
    #[arg(long, default_value = "og-template.html")]
    input: PathBuf,
    /// PNG file to write
    #[arg(long, default_value = "client/public/og-image.png")]
    output: PathBuf,
    #[arg(long, default_value_t = 1200)]
    width: u32,
    #[arg(long, default_value_t = 630)]
    height: u32,
    /// Rendering backend: cdp or raster
    #[arg(long, default_value_t = Backend::default())]
    backend: Backend,
}

#[derive(Args)]
struct OptimizeArgs {
    /// Public directory scanned for .png/.jpg/.jpeg files
    #[arg(long, default_value = "client/public")]
    dir: PathBuf,
    /// Files to optimize before the scan (defaults to the curated MIS images in --dir)
    #[arg(long = "file")]
    files: Vec<PathBuf>,
    /// Images wider than this are downscaled
    #[arg(long, default_value_t = 1200)]
    max_width: u32,
    /// JPEG quality, 1-100
    #[arg(long, default_value_t = 80)]
    quality: u8,
    /// Print the batch report as JSON when done
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn render(args: RenderArgs) -> anyhow::Result<()> {
    let job = RenderJob {
        input: args.input,
        output: args.output,
        viewport: Viewport {
            width: args.width,
            height: args.height,
        },
    };
    ogkit::render_snapshot(&job, args.backend)?;
    Ok(())
}

fn optimize(args: OptimizeArgs) -> anyhow::Result<()> {
    let mut config = OptimizeConfig::for_public_dir(&args.dir);
    if !args.files.is_empty() {
        config.files = args.files;
    }
    config.max_width = args.max_width;
    config.quality = args.quality;
    config.validate()?;

    let report = optimize::run_batch(&config);
    info!(
        "{} optimized, {} failed, {} bytes saved",
        report.optimized_count(),
        report.failed_count(),
        report.bytes_saved()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    // Per-file failures are reported above, never through the exit status
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(args),
        Command::Optimize(args) => optimize(args),
    }
}
