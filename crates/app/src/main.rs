use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use membrane_modes_core::{
    animate_membrane, plot_membrane_peak, AppConfig, Artifact, MembraneParams, ModeSweep,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(%err, "membrane-modes failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> membrane_modes_core::Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if cli.no_labels {
        config.animation.labels = false;
        config.peak_plot.labels = false;
    }

    match cli.command {
        Commands::Animate { filename, membrane } => {
            let membrane = membrane.into_params().build()?;
            animate_membrane(&filename, membrane.as_ref(), &config.animation, &config.output)?;
        }
        Commands::Plot { filename, membrane } => {
            let membrane = membrane.into_params().build()?;
            plot_membrane_peak(&filename, membrane.as_ref(), &config.peak_plot, &config.output)?;
        }
        Commands::Sweep { artifact } => {
            let sweep = ModeSweep::new(artifact.into(), &config.animation);
            let report = sweep.run(&config.peak_plot, &config.output);
            for failure in &report.failed {
                tracing::error!(filename = %failure.filename, error = %failure.error, "artifact failed");
            }
            if !report.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Render vibrating membrane eigenmodes", long_about = None)]
struct Cli {
    /// JSON file overriding the default render settings.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Skip titles and axis labels.
    #[arg(long, global = true)]
    no_labels: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Animate one mode into the animation directory (.gif or video).
    Animate {
        filename: String,
        #[command(subcommand)]
        membrane: MembraneCommand,
    },
    /// Save the peak displacement of one mode into the plot directory.
    Plot {
        filename: String,
        #[command(subcommand)]
        membrane: MembraneCommand,
    },
    /// Render every low-order mode of both membrane shapes.
    Sweep {
        #[arg(long, value_enum, default_value_t = SweepArtifact::Animation)]
        artifact: SweepArtifact,
    },
}

#[derive(Subcommand, Debug)]
enum MembraneCommand {
    /// Circular membrane clamped along its rim.
    Circular(CircularArgs),
    /// Rectangular membrane clamped on all edges.
    Rectangular(RectangularArgs),
}

#[derive(Args, Debug)]
struct CircularArgs {
    #[arg(long, default_value_t = 1.0)]
    radius: f64,
    #[arg(long, default_value_t = 1.0)]
    stiffness: f64,
    /// Angular order of the mode.
    #[arg(short, default_value_t = 0)]
    m: u32,
    /// Radial index of the mode, starting at 1.
    #[arg(short, default_value_t = 1)]
    n: u32,
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,
    /// Rescale the mode so its characteristic amplitude equals this value.
    #[arg(long)]
    normalize: Option<f64>,
}

#[derive(Args, Debug)]
struct RectangularArgs {
    #[arg(long, default_value_t = 1.0)]
    width: f64,
    #[arg(long, default_value_t = 2.0)]
    height: f64,
    #[arg(short, default_value_t = 1.0)]
    m: f64,
    #[arg(short, default_value_t = 1.0)]
    n: f64,
    #[arg(long, default_value_t = 1.0)]
    stiffness: f64,
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,
    #[arg(long)]
    normalize: Option<f64>,
}

impl MembraneCommand {
    fn into_params(self) -> MembraneParams {
        match self {
            MembraneCommand::Circular(args) => MembraneParams::Circular {
                radius: args.radius,
                stiffness: args.stiffness,
                m: args.m,
                n: args.n,
                amplitude: args.amplitude,
                normalize: args.normalize,
            },
            MembraneCommand::Rectangular(args) => MembraneParams::Rectangular {
                width: args.width,
                height: args.height,
                m: args.m,
                n: args.n,
                stiffness: args.stiffness,
                amplitude: args.amplitude,
                normalize: args.normalize,
            },
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SweepArtifact {
    Animation,
    Plot,
}

impl From<SweepArtifact> for Artifact {
    fn from(value: SweepArtifact) -> Self {
        match value {
            SweepArtifact::Animation => Artifact::Animation,
            SweepArtifact::Plot => Artifact::PeakPlot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_circular_animation() {
        let cli = Cli::parse_from([
            "membrane-modes",
            "animate",
            "circular12.gif",
            "circular",
            "-m",
            "1",
            "-n",
            "2",
            "--normalize",
            "0.5",
        ]);

        let Commands::Animate { filename, membrane } = cli.command else {
            panic!("expected the animate command");
        };
        assert_eq!(filename, "circular12.gif");
        assert_eq!(
            membrane.into_params(),
            MembraneParams::Circular {
                radius: 1.0,
                stiffness: 1.0,
                m: 1,
                n: 2,
                amplitude: 1.0,
                normalize: Some(0.5),
            }
        );
    }

    #[test]
    fn parses_sweep_with_global_flags() {
        let cli = Cli::parse_from(["membrane-modes", "sweep", "--artifact", "plot", "--no-labels"]);
        assert!(cli.no_labels);
        assert!(matches!(
            cli.command,
            Commands::Sweep {
                artifact: SweepArtifact::Plot
            }
        ));
    }
}
