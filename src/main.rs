use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};
use color_eyre::eyre::{
    Error,
    bail,
};
use dotenvy::dotenv;
use pic_fdsolver::config::SolverConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    let _ = dotenv();
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Command::Check { config } => {
            let solver_config = SolverConfig::load(&config)?;
            let solver = solver_config.build()?;
            let time_step = solver_config.time_step(&solver)?;

            tracing::info!(path = %config.display(), "config ok");
            println!("algorithm:     {}", solver.algorithm());
            println!("family:        {}", solver.family());
            for (axis, coefficients) in solver.coefficients().iter().enumerate() {
                println!("axis {axis}:        {coefficients:?}");
            }
            println!("max time step: {:e}", solver.max_time_step());
            println!("time step:     {time_step:e}");
            println!("threads:       {}", solver.threading().num_threads());
        }
        Command::DumpDefaultConfig { output, format } => {
            let config = SolverConfig::default();
            let config = match format.as_str() {
                "toml" => toml::to_string_pretty(&config)?,
                "json" => serde_json::to_string_pretty(&config)?,
                _ => bail!("Invalid format: {format}"),
            };
            if let Some(output) = &output {
                std::fs::write(output, &config)?;
            }
            else {
                println!("{config}");
            }
        }
    }

    Ok(())
}

#[derive(Debug, Parser)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the solver from a config file and print the resolved algorithm.
    Check {
        /// Path to the TOML config
        config: PathBuf,
    },
    DumpDefaultConfig {
        #[clap(short, long)]
        output: Option<PathBuf>,
        #[clap(short, long, default_value = "toml")]
        format: String,
    },
}
