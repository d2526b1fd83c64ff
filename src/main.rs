use clap::Parser;
use log::{error, info};

use labelme2coco::{process_dataset, Args};

fn main() {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match args.to_converter_config() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!("Starting LabelMe to COCO conversion process...");

    match process_dataset(&config) {
        Ok(_) => info!(
            "COCO dataset written to {}",
            config.output_dir.display()
        ),
        Err(e) => {
            error!("Failed to process dataset: {}", e);
            std::process::exit(1);
        }
    }
}
