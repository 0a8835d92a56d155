pub mod progress;

use crate::utils::dump::SimulationReport;

pub fn print_banner() {
    println!("Guided Scrambling Simulator");
}

/// Human readable digest of a finished run.
pub fn print_report(report: &SimulationReport) {
    let session = &report.session;
    println!(
        "GF({}) L={} A={} {} {} scrambler {}",
        session.field_size,
        session.codeword_length,
        session.augmenting_length,
        if session.continuous { "continuous" } else { "block" },
        session.selection_method,
        crate::scrambling::words::to_string(&session.scrambler),
    );
    println!("Codewords:          {}", report.words);
    println!("Mean winning cost:  {:.3}", report.mean_cost);
    println!("Mean |RDS|:         {:.3}", report.rds.mean_magnitude);
    println!("RDS variance:       {:.3}", report.rds.variance);
    println!("Peak |RDS|:         {:.3}", report.rds.peak);
    if let Some(errors) = &report.errors {
        println!(
            "Symbol errors:      {}/{} (rate {:.3e})",
            errors.errors,
            errors.symbols,
            errors.rate()
        );
    }
    if let Some(noise) = report.measured_noise_power {
        println!("Measured noise:     {:.4}", noise);
    }
}
