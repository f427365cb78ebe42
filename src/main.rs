use clap::Parser;
use quill::core::config;
use quill::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "quill", about = "AI writing assistant with study tools")]
struct Args {
    /// Model identifier to use for completions
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger - writes to quill.log in the current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("quill.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    let resolved = config::resolve(&file_config, args.model.as_deref());

    log::info!("Quill starting up with model: {}", resolved.model_name);

    tui::run(resolved)
}
