use clap::Parser;
use guided_scrambling::config::GsConfig;
use guided_scrambling::scrambling::AugmentingPosition;
use guided_scrambling::simulation::{Simulation, SimulationOptions};
use guided_scrambling::ui::progress::{ProgressManager, templates};
use guided_scrambling::ui::{print_banner, print_report};
use guided_scrambling::utils::consts::*;
use guided_scrambling::utils::logging::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(author, version, about = "Guided scrambling simulator", long_about = None)]
struct Cli {
    /// JSON session configuration; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long)]
    field_size: Option<u32>,
    #[arg(short = 'l', long)]
    codeword_length: Option<usize>,
    #[arg(short, long)]
    augmenting_length: Option<usize>,
    /// MSW, WRDS or MSW2
    #[arg(short = 'm', long)]
    selection_method: Option<String>,
    /// Scrambling polynomial, leading coefficient first, e.g. 1,0,0,1,0,1
    #[arg(short = 'p', long, value_delimiter = ',')]
    scrambler: Option<Vec<u32>>,
    /// Reset the scrambler at every codeword
    #[arg(short, long)]
    block: bool,
    /// Place the augmenting symbols after the data
    #[arg(long)]
    trailing: bool,
    /// Worker threads for the candidate search
    #[arg(short, long)]
    threads: Option<usize>,
    /// Channel noise power
    #[arg(short, long, default_value_t = 0.0)]
    noise: f64,
    /// Run the detector and measure the symbol error rate
    #[arg(short, long)]
    errors: bool,
    /// Symbol probability weightings, e.g. 1,1,1,3
    #[arg(short, long, value_delimiter = ',')]
    symbol_weightings: Option<Vec<f64>>,
    /// Codewords to process
    #[arg(short = 'd', long, default_value_t = DEFAULT_WORDS)]
    words: usize,
    /// Codewords averaged by the detector's noise estimate
    #[arg(short, long, default_value_t = DEFAULT_WINDOW_SIZE)]
    window_size: usize,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Write a JSON report here
    #[arg(short = 'o', long)]
    report: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn session_config(&self) -> Result<GsConfig, guided_scrambling::ConfigError> {
        let mut config = match &self.config {
            Some(path) => GsConfig::from_file(path)?,
            None => GsConfig::default(),
        };
        if let Some(field_size) = self.field_size {
            config.field_size = field_size;
            // a constellation from the file only fits its own field size
            if self.config.is_some() && config.constellation.is_some() {
                warn!("Overriding the field size keeps the configured constellation");
            }
        }
        if let Some(length) = self.codeword_length {
            config.codeword_length = length;
        }
        if let Some(length) = self.augmenting_length {
            config.augmenting_length = length;
        }
        if let Some(method) = &self.selection_method {
            config.selection_method = method.clone();
        }
        if let Some(scrambler) = &self.scrambler {
            config.scrambler = Some(scrambler.clone());
        }
        if self.block {
            config.continuous = false;
        }
        if self.trailing {
            config.augmenting_position = AugmentingPosition::Trailing;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    print_banner();

    let session = match cli.session_config().and_then(|config| config.validate()) {
        Ok(session) => session,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = SimulationOptions {
        words: cli.words,
        noise_power: cli.noise,
        window_size: cli.window_size,
        seed: cli.seed,
        weightings: cli.symbol_weightings.clone(),
        measure_errors: cli.errors,
    };
    let mut simulation = match Simulation::new(session, options) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("Cannot start simulation: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let s = stop.clone();
    // Ctrl+C raises the stop flag
    if let Err(e) = ctrlc::set_handler(move || {
        s.store(true, Ordering::SeqCst);
    }) {
        warn!("Error setting Ctrl-C handler: {}", e);
    }

    let progress_manager = ProgressManager::new();
    if let Err(e) =
        progress_manager.create_bar("encode", cli.words as u64, templates::ENCODE, "")
    {
        warn!("{}", e);
    }
    let update_every = (cli.words / 100).max(1) as u64;
    let result = simulation.run(&stop, |done| {
        if done % update_every == 0 {
            let _ = progress_manager.set_position("encode", done);
        }
    });
    let _ = progress_manager.finish("encode", "done");
    progress_manager.finish_all();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("Simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    print_report(&report);

    if let Some(path) = &cli.report {
        if let Err(e) = report.write_json(path) {
            error!("Failed to write report {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        info!("Report written to {}", path.display());
    }
    ExitCode::SUCCESS
}
