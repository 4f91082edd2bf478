use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "chordmidi")]
#[command(version = "0.1.0")]
#[command(about = "Chord score to MIDI compiler", long_about = None)]
struct Args {
    /// Input score file (reads from stdin if not specified)
    input: Option<PathBuf>,

    /// Output MIDI file (defaults to the input with a .midi extension)
    #[arg(short, long, required_unless_present_any = ["input", "list_chords"])]
    output: Option<PathBuf>,

    /// Octave shift, replacing the score's setting
    #[arg(short = 's', long, allow_hyphen_values = true)]
    octave_shift: Option<i8>,

    /// Custom chord file, replacing the score's setting
    #[arg(short, long)]
    custom_file: Option<PathBuf>,

    /// List known chord qualities and strum patterns
    #[arg(short = 'L', long)]
    list_chords: bool,

    /// Log every chord written
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), chordmidi::Error> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    if args.list_chords {
        for quality in chordmidi::tone::QUALITIES {
            println!("{:<6} {:?}", quality.name, quality.intervals);
        }
        for (name, groups) in chordmidi::tone::PATTERNS {
            println!("pattern {} = {}", name, groups);
        }
        return Ok(());
    }

    let mut compiler = chordmidi::Compiler::new();
    compiler.octave_shift = args.octave_shift;
    compiler.custom_file = args.custom_file;

    match &args.input {
        Some(path) => {
            let output = args.output.unwrap_or_else(|| path.with_extension("midi"));
            // Use compile_file to resolve the chord file next to the score
            compiler.compile_file(path, &output)?;
        }
        None => {
            let output = args.output.expect("clap requires --output without an input");
            compiler.compile(std::io::stdin(), &output)?;
        }
    }

    Ok(())
}
