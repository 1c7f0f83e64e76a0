use atlas::core::config::{self, AtlasConfig, CliOverrides};
use atlas::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "atlas", about = "Browse, search and bookmark the world's countries")]
struct Args {
    /// Country API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Screen to open on: "/" or "/country/<code>"
    #[arg(short, long)]
    route: Option<String>,

    /// Directory holding the favorites file
    #[arg(long)]
    data_dir: Option<String>,

    /// Quiet period before a search is sent, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to atlas.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("atlas.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("{}, using defaults", e);
        AtlasConfig::default()
    });
    let cli = CliOverrides {
        base_url: args.base_url,
        route: args.route,
        data_dir: args.data_dir,
        debounce_ms: args.debounce_ms,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Atlas starting up: base_url={}, route={}",
        resolved.base_url,
        resolved.start_route
    );

    tui::run(resolved)
}
