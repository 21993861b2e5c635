use birdbuddy_rs::config::ProcessorConfig;
use birdbuddy_rs::formatter::ReportFormatter;
use birdbuddy_rs::processor::{EventProcessor, LISTEN_EVENT_NAME};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "birdbuddy_cli")]
#[command(about = "Process a saved Bird Buddy sighting event and print the outputs")]
#[command(rename_all = "snake_case")]
struct Args {
    /// Event file, YAML or JSON
    #[arg(short, long)]
    event_file: String,

    /// What to print: event (report and slack_message), report, slack_message
    #[arg(short, long, default_value = "event")]
    output: String,

    /// Skip the Wikipedia lookup (or set BIRDBUDDY_ENRICHMENT_ENABLED=false)
    #[arg(long)]
    no_enrichment: bool,

    /// Append a video block per bird (or set BIRDBUDDY_INCLUDE_VIDEO_BLOCK=true)
    #[arg(long)]
    video_block: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

// example usage:
// ./target/release/birdbuddy_cli --event_file tests/data/birds_event_two_birds.yml
// ./target/release/birdbuddy_cli --event_file tests/data/birds_event_two_birds.yml --output slack_message --no_enrichment

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("birdbuddy_rs={}", args.log_level))
        .init();

    let mut config = ProcessorConfig::from_env()?;
    if args.no_enrichment {
        config.enrichment_enabled = false;
    }
    if args.video_block {
        config.include_video_block = true;
    }

    info!("Loading event from {}", args.event_file);
    let formatter = match ReportFormatter::from_yaml(&args.event_file) {
        Ok(formatter) => formatter,
        Err(e) => {
            error!("Failed to load event: {}", e);
            std::process::exit(1);
        }
    };

    let processor = EventProcessor::from_config(&config)?;
    info!("Simulating {} for postcard {}", LISTEN_EVENT_NAME, formatter.model().postcard.id);
    let processed = processor.process(formatter.into_model());

    match args.output.as_str() {
        "event" => {
            println!("{}", serde_json::to_string_pretty(&processed.to_event_data()?)?);
        }
        "report" => {
            println!("{}", serde_json::to_string_pretty(&processed.report)?);
        }
        "slack_message" => {
            println!("{}", serde_json::to_string_pretty(&processed.slack_message)?);
        }
        other => {
            eprintln!("Unknown output: {} (expected event, report or slack_message)", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
