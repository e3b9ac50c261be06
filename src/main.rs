use clap::Parser;
use colored::Colorize;
use prereq_audit::{audit, Cli, NinkaClassifier};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match audit::config_from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            return ExitCode::from(2);
        }
    };

    let classifier = NinkaClassifier::new(&cli.classifier);
    match audit::run(&config, &classifier) {
        Ok(count) => {
            println!(
                "{} {} license record(s) written to {}",
                "✓".green(),
                count,
                config.output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}
