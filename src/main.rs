//! tonegen - render a song of synthesized notes to an 8-bit mono WAV file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tonegen_core::dsp::wav;
use tonegen_core::song::Song;

#[derive(Parser)]
#[command(name = "tonegen")]
#[command(about = "Render synthesized notes to a WAV file")]
#[command(version)]
struct Cli {
    /// JSON song description (default: built-in "Mary Had a Little Lamb")
    #[arg(long)]
    song: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "mary.wav")]
    output: PathBuf,

    /// Override the song's sample rate (Hz)
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Volume for the built-in melody (0.0 - 1.0, or 11)
    #[arg(long, default_value_t = 0.75)]
    volume: f64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut song = match &cli.song {
        Some(path) => {
            tracing::info!("Loading song from {:?}", path);
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read song {:?}", path))?;
            Song::from_json(&source).with_context(|| format!("Invalid song {:?}", path))?
        }
        None => Song::mary_had_a_little_lamb(cli.volume),
    };
    if let Some(rate) = cli.sample_rate {
        song.config.sample_rate = rate;
    }

    tracing::info!(
        notes = song.notes.len(),
        seconds = song.duration(),
        sample_rate = song.config.sample_rate,
        "Rendering"
    );
    let sampler = song.render().context("Failed to render song")?;

    let file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {:?}", cli.output))?;
    let mut out = BufWriter::new(file);
    wav::write_wav(&sampler, &mut out)
        .with_context(|| format!("Failed to write {:?}", cli.output))?;
    out.flush()
        .with_context(|| format!("Failed to write {:?}", cli.output))?;

    println!("Wrote {}", cli.output.display());
    Ok(())
}
