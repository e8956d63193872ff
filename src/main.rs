//! Moneta main entry point

use clap::Parser;
use moneta_api::start_server;
use moneta_config::Config;
use moneta_core::Book;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "moneta")]
#[command(version = "0.1.0")]
#[command(about = "A lightweight personal-finance web interface", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let rt = Runtime::new()?;

    rt.block_on(async {
        let config = match Config::load(args.config.clone()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[WARN] {}; falling back to defaults", e);
                Config::default()
            }
        };

        eprintln!(
            "[INFO] Config loaded: data path={}, book file={}",
            config.data.path.to_string_lossy(),
            config.data.book_file
        );

        let mut book = Book::new(config.clone());
        let book_path = config.book_path();
        eprintln!("[INFO] Looking for book file: {}", book_path.to_string_lossy());

        if book_path.exists() {
            eprintln!("[INFO] Book file found, loading...");
            match book.load(book_path) {
                Ok(_) => eprintln!("[INFO] Book loaded successfully"),
                Err(e) => eprintln!("[ERROR] Failed to load book: {:?}", e),
            }
        } else {
            eprintln!("[WARN] Book file not found: {}", book_path.display());
        }

        let book = Arc::new(RwLock::new(book));
        start_server(config, book).await
    });

    Ok(())
}
