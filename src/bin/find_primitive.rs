use clap::Parser;
use guided_scrambling::scrambling::primitives::{find_primitive, primitives, trinomial};
use guided_scrambling::scrambling::words::to_string;
use guided_scrambling::ui::progress::{ProgressManager, templates};
use guided_scrambling::utils::logging::init_logging;
use std::process::ExitCode;
use tracing::error;

/// Lists primitive polynomials over GF(q), leading coefficient first.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Field size: 2, 4, 8 or 16
    #[arg(short, long, default_value_t = 4)]
    field_size: u32,
    /// Smallest degree to search
    #[arg(long, default_value_t = 1)]
    min_degree: usize,
    /// Largest degree to search
    #[arg(long, default_value_t = 5)]
    max_degree: usize,
    /// Print every primitive polynomial instead of the first
    #[arg(short, long, conflicts_with = "trinomial")]
    all: bool,
    /// Only accept polynomials with three non-zero terms
    #[arg(short, long)]
    trinomial: bool,
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let degrees = cli.min_degree.max(1)..=cli.max_degree;
    let progress_manager = ProgressManager::new();
    let _ = progress_manager.create_bar(
        "search",
        degrees.clone().count() as u64,
        templates::SEARCH,
        "",
    );

    let mut lines = Vec::new();
    for degree in degrees {
        let _ = progress_manager.set_message("search", &format!("degree {}", degree));
        let found = if cli.all {
            primitives(cli.field_size, degree)
        } else if cli.trinomial {
            trinomial(cli.field_size, degree).map(|p| vec![p])
        } else {
            find_primitive(cli.field_size, degree).map(|p| vec![p])
        };
        match found {
            Ok(polynomials) => {
                for polynomial in polynomials {
                    lines.push(format!("{:>2}: {}", degree, to_string(&polynomial)));
                }
            }
            Err(e) => {
                // unsupported field sizes fail for every degree
                if matches!(e, guided_scrambling::ConfigError::BadFieldSize(_)) {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
                lines.push(format!("{:>2}: none ({})", degree, e));
            }
        }
        let _ = progress_manager.set_position("search", (degree - cli.min_degree.max(1) + 1) as u64);
    }
    progress_manager.finish_all();

    for line in lines {
        println!("{}", line);
    }
    ExitCode::SUCCESS
}
