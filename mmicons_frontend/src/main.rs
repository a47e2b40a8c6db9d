use std::path::PathBuf;
use std::time::Duration;
use log::{error, info, warn, LevelFilter};
use simplelog::{Config, SimpleLogger};
use clap::Parser;
use mmicons_core::app_name::AppName;
use mmicons_core::config::{ServiceConfig, DEFAULT_IMAGE_MODEL, DEFAULT_VISION_MODEL};
use mmicons_core::generation::RetryPolicy;
use mmicons_core::icon_store::IconStore;
use mmicons_core::openai_service::OpenAIService;
use mmicons_core::request_clock::{RequestClock, SystemClock, MIN_REQUEST_INTERVAL};
use crate::icon_worker::IconWorker;
use crate::orchestrator::{Orchestrator, OrchestratorError};
use crate::session::SessionError;

mod icon_worker;
mod orchestrator;
mod session;
#[cfg(test)]
pub mod tests;

const DEFAULT_OUTPUT_DIR: &str = "icons";

#[derive(Parser, Debug)]
#[command(author, version, about = "Generate themed app icons from a home-screen screenshot", long_about = None)]
pub struct Args {
    #[arg(
        help = "home-screen screenshot to read app names from",
        required_unless_present = "names"
    )]
    screenshot: Option<PathBuf>,

    #[arg(
        short = 't',
        long = "theme",
        help = "style applied to every generated icon"
    )]
    theme: String,

    #[arg(
        short = 'n',
        long = "names",
        help = "comma separated app names, skips reading the screenshot"
    )]
    names: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        help = "directory the icons are saved to",
        default_value = DEFAULT_OUTPUT_DIR
    )]
    out: PathBuf,

    #[arg(
        long = "api-key",
        env = "OPENAI_API_KEY",
        hide_env_values = true,
        help = "OpenAI API key"
    )]
    api_key: String,

    #[arg(
        long = "vision-model",
        help = "model reading app names from the screenshot",
        default_value = DEFAULT_VISION_MODEL
    )]
    vision_model: String,

    #[arg(
        long = "image-model",
        help = "model generating the icons",
        default_value = DEFAULT_IMAGE_MODEL
    )]
    image_model: String,

    #[arg(
        long = "max-retries",
        help = "give up on an icon after this many rate limited retries (default: retry forever)"
    )]
    max_retries: Option<u32>,

    #[arg(
        long = "min-interval",
        help = "minimum seconds between two icon requests",
        default_value_t = MIN_REQUEST_INTERVAL.as_secs()
    )]
    min_interval: u64,

    #[arg(
        short = 'd',
        long = "debug",
        help = "debug mode",
        default_value_t = 0
    )]
    debug: u8,
}

fn logger_init(debug: u8) {

    let log_level = match debug {
        1 => LevelFilter::Debug,
        2 => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    let _ = SimpleLogger::init(log_level, Config::default());
}

fn build_orchestrator(args: &Args) -> Result<Orchestrator, OrchestratorError> {
    let config = ServiceConfig::new(args.api_key.clone())
        .with_vision_model(args.vision_model.clone())
        .with_image_model(args.image_model.clone());

    let service = OpenAIService::new(config)
        .map_err(|e| OrchestratorError::Configuration(e.to_string()))?;

    let retry_policy = match args.max_retries {
        Some(max) => RetryPolicy::Limited(max),
        None => RetryPolicy::Unbounded,
    };

    let request_clock = RequestClock::new(Duration::from_secs(args.min_interval));
    let worker = IconWorker::spawn(service, SystemClock, request_clock, retry_policy)?;

    Ok(Orchestrator::new(worker, IconStore::new(&args.out)))
}

fn run(args: Args) -> Result<(), OrchestratorError> {
    let mut orchestrator = build_orchestrator(&args)?;
    let cancel = orchestrator.cancel_token();

    if let Err(e) = ctrlc::set_handler(move || {
        warn!("interrupted, stopping after the current request ...");
        cancel.cancel();
    }) {
        warn!("could not install interrupt handler: {}", e);
    }

    match (&args.names, &args.screenshot) {
        (Some(names), _) => orchestrator.use_names(AppName::parse_list(names))?,
        (None, Some(path)) => {
            orchestrator.upload_file(path)?;
            let names = orchestrator.extract_names()?;
            info!("apps found: {}", names.iter().map(AppName::as_str).collect::<Vec<_>>().join(", "));
        },
        (None, None) => return Err(OrchestratorError::Session(SessionError::NoScreenshot)),
    }

    let generated = orchestrator.generate_icons(&args.theme);

    let saved = orchestrator.save()?;
    info!("{} icon(s) written to {}, session {}", saved.len(), args.out.display(), orchestrator.session().phase());

    generated.map(|_| ())
}

fn main() -> Result<(), OrchestratorError> {
    let args: Args = Args::parse();

    logger_init(args.debug);

    run(args).map_err(|e| {
        error!("{}", e);
        e
    })
}
