use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use wavesmith_lib::{AudioSource, Edit, EngineConfig, ExportedAudio, Exporter, FadeDirection};

/// Command-line audio editor: inspect, trim and re-encode audio as 16-bit WAV
#[derive(Parser, Debug)]
#[command(name = "wavesmith")]
#[command(about = "Decode, edit and export audio files as 16-bit PCM WAV", long_about = None)]
struct Args {
    /// JSON config file (waveform_buckets, output_suffix_separator)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print duration, sample rate and channel layout as JSON
    Info { input: PathBuf },

    /// Print the peak envelope as a JSON array
    Waveform {
        input: PathBuf,

        /// Number of peaks (defaults to the configured bucket count)
        #[arg(short, long)]
        buckets: Option<usize>,
    },

    /// Keep only the audio between two times
    Trim {
        #[command(flatten)]
        io: Io,

        /// Start time in seconds
        #[arg(short, long)]
        start: f64,

        /// End time in seconds
        #[arg(short, long)]
        end: f64,
    },

    /// Multiply every sample by a factor
    Gain {
        #[command(flatten)]
        io: Io,

        #[arg(short, long)]
        factor: f32,
    },

    /// Linear fade in or out
    Fade {
        #[command(flatten)]
        io: Io,

        /// "in" or "out"
        #[arg(short, long, value_parser = parse_direction)]
        direction: FadeDirection,

        /// Fade length in seconds
        #[arg(short = 'l', long)]
        duration: f64,
    },

    /// Play the audio backwards
    Reverse {
        #[command(flatten)]
        io: Io,
    },

    /// Resample to change speed (and pitch)
    Speed {
        #[command(flatten)]
        io: Io,

        #[arg(short, long)]
        factor: f64,
    },

    /// Run a JSON list of edits in order
    Apply {
        #[command(flatten)]
        io: Io,

        /// File holding e.g. [{"op": "reverse"}, {"op": "gain", "factor": 0.5}]
        #[arg(short, long)]
        edits: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct Io {
    /// Input audio file (MP3, FLAC, WAV, OGG, etc.)
    input: PathBuf,

    /// Output WAV file (defaults to a suffixed name next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn parse_direction(value: &str) -> Result<FadeDirection, String> {
    match value.to_ascii_lowercase().as_str() {
        "in" => Ok(FadeDirection::In),
        "out" => Ok(FadeDirection::Out),
        other => Err(format!("expected \"in\" or \"out\", got {:?}", other)),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "wavesmith=debug,wavesmith_lib=debug"
    } else {
        "wavesmith=info,wavesmith_lib=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let exporter = Exporter::new(config);

    match args.command {
        Command::Info { input } => {
            let info = exporter.audio_info(&load(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Waveform { input, buckets } => {
            let peaks = exporter.waveform(&load(&input)?, buckets)?;
            println!("{}", serde_json::to_string(&peaks)?);
        }
        Command::Trim { io, start, end } => {
            let exported = exporter.trim(&load(&io.input)?, start, end)?;
            save(&io, exported)?;
        }
        Command::Gain { io, factor } => {
            let exported = exporter.adjust_volume(&load(&io.input)?, factor)?;
            save(&io, exported)?;
        }
        Command::Fade {
            io,
            direction,
            duration,
        } => {
            let exported = exporter.fade(&load(&io.input)?, direction, duration)?;
            save(&io, exported)?;
        }
        Command::Reverse { io } => {
            let exported = exporter.reverse(&load(&io.input)?)?;
            save(&io, exported)?;
        }
        Command::Speed { io, factor } => {
            let exported = exporter.change_speed(&load(&io.input)?, factor)?;
            save(&io, exported)?;
        }
        Command::Apply { io, edits } => {
            let json = std::fs::read_to_string(&edits)
                .with_context(|| format!("Failed to read edits from {}", edits.display()))?;
            let edits: Vec<Edit> = serde_json::from_str(&json).context("Invalid edit list")?;
            let exported = exporter.process(&load(&io.input)?, &edits)?;
            save(&io, exported)?;
        }
    }

    Ok(())
}

fn load(path: &Path) -> anyhow::Result<AudioSource> {
    let source = AudioSource::from_path(path)?;
    tracing::debug!(path = %path.display(), bytes = source.bytes().len(), "read input");
    Ok(source)
}

fn save(io: &Io, exported: ExportedAudio) -> anyhow::Result<()> {
    let output = match &io.output {
        Some(path) => path.clone(),
        None => io
            .input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&exported.file_name),
    };

    if output == io.input {
        bail!("Refusing to overwrite the input file {}", output.display());
    }

    std::fs::write(&output, &exported.bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        duration_seconds = exported.duration_seconds,
        "saved"
    );
    println!("{}", output.display());

    Ok(())
}
