//! voicesplit - write one monophonic MIDI file per voice
//!
//! Run with: cargo run -- song.mid --out-dir lanes/

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;
use voicesplit::{
    io::{split_file, MidiFile},
    split::{split, EmittedVoice, SplitSummary},
    SplitConfig, CHANNEL_COUNT,
};

#[derive(Parser)]
#[command(name = "voicesplit")]
#[command(about = "Split a MIDI file into one monophonic file per voice", long_about = None)]
struct Cli {
    /// Standard MIDI file to split
    input: PathBuf,

    /// Directory for the output files (default: next to the input)
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Prefix for output file names (default: input file stem)
    #[arg(short, long)]
    name: Option<String>,

    /// 0-based channel treated as drums, one voice per drum key
    #[arg(
        long,
        default_value_t = voicesplit::PERCUSSION_CHANNEL,
        value_parser = clap::value_parser!(u8).range(0..i64::from(CHANNEL_COUNT))
    )]
    percussion_channel: u8,

    /// Treat every channel as melodic
    #[arg(long, conflicts_with = "percussion_channel")]
    no_percussion: bool,

    /// Split and report without writing any files
    #[arg(long)]
    dry_run: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> SplitConfig {
        let percussion = (!self.no_percussion).then_some(self.percussion_channel);
        let mut config = SplitConfig::new().percussion_channel(percussion);
        if let Some(dir) = &self.out_dir {
            config = config.output_dir(dir);
        }
        if let Some(name) = &self.name {
            config = config.base_name(name);
        }
        config
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = cli.config();
    if cli.dry_run {
        let file = MidiFile::open(&cli.input)?;
        let mut voices: Vec<EmittedVoice> = Vec::new();
        let summary = split(&file.timeline, &config, &mut voices)?;

        let dir = config.resolve_output_dir(&cli.input);
        let base = config.resolve_base_name(&cli.input);
        let planned: Vec<PathBuf> = summary
            .voices
            .iter()
            .map(|label| dir.join(label.file_name(&base)))
            .collect();
        report(&summary, &planned, "would write");
    } else {
        let output = split_file(&cli.input, &config)?;
        report(&output.summary, &output.paths, "wrote");
    }

    Ok(())
}

fn report(summary: &SplitSummary, paths: &[PathBuf], verb: &str) {
    for path in paths {
        println!("{} {}", verb, path.display());
    }
    println!(
        "{} voices, {} ticks each",
        summary.voices.len(),
        summary.length_ticks
    );
}
