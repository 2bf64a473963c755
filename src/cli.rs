use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pitchshift::io::wav::{read_wav_file, write_wav_file, MonoClip, WavEncoding};
use pitchshift::{PshiftError, PshifterProps, BUFFER_LINE_SIZE};

/// Pitch-shifts the first channel of a WAV file.
#[derive(Debug, Parser)]
#[command(name = "pshift", version, about)]
struct Cli {
    /// Input WAV file (16/24/32-bit PCM or 32-bit float).
    input: PathBuf,

    /// Output WAV file (mono).
    output: PathBuf,

    /// Shift in semitones, -12 to 12.
    #[arg(long, allow_hyphen_values = true)]
    coarse: Option<i32>,

    /// Additional shift in cents, -50 to 50.
    #[arg(long, allow_hyphen_values = true)]
    fine: Option<i32>,

    /// Samples per processing block, 1 to 1024.
    #[arg(long, default_value_t = BUFFER_LINE_SIZE)]
    block: usize,

    /// JSON file with `coarse_tune`/`fine_tune`; flags override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write 32-bit float output instead of 16-bit PCM.
    #[arg(long)]
    float: bool,

    /// Show detailed processing parameters and timing.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn props(&self) -> Result<PshifterProps, PshiftError> {
        let mut props = match &self.config {
            Some(path) => PshifterProps::from_json_file(path)?,
            None => PshifterProps::default(),
        };
        if let Some(coarse) = self.coarse {
            props.set_coarse_tune(coarse)?;
        }
        if let Some(fine) = self.fine {
            props.set_fine_tune(fine)?;
        }
        Ok(props)
    }

    fn encoding(&self) -> WavEncoding {
        if self.float {
            WavEncoding::Float32
        } else {
            WavEncoding::Pcm16
        }
    }
}

fn run(cli: &Cli) -> Result<(), PshiftError> {
    let props = cli.props()?;
    let clip = read_wav_file(&cli.input)?;
    log::info!(
        "input: {} samples, {} Hz, {:.2}s",
        clip.samples.len(),
        clip.sample_rate,
        clip.duration_secs()
    );
    log::info!(
        "shift: {} semitones {:+} cents, block {}",
        props.coarse_tune,
        props.fine_tune,
        cli.block
    );

    let start = std::time::Instant::now();
    let shifted = pitchshift::render(&clip.samples, clip.sample_rate, &props, cli.block)?;
    let elapsed = start.elapsed().as_secs_f64();

    let realtime_factor = if elapsed > 0.0 {
        clip.duration_secs() / elapsed
    } else {
        f64::INFINITY
    };
    log::info!("processing time: {elapsed:.3}s ({realtime_factor:.1}x realtime)");

    let output = MonoClip::new(shifted, clip.sample_rate);
    write_wav_file(&cli.output, &output, cli.encoding())?;
    log::info!("written to {}", cli.output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
