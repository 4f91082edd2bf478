//! MIDI to JSON converter

use chordmidi::midi::{MidiJson, MidiReader};
use clap::Parser;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// gzip magic number
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Parser, Debug)]
#[command(name = "midi2json")]
#[command(version = "0.1.0")]
#[command(about = "Convert MIDI files to JSON", long_about = None)]
struct Args {
    /// Input .mid/.midi file, optionally gzip-compressed
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let args = Args::parse();

    let data = read_midi_file(&args.input)?;

    let mut reader = MidiReader::new(&data);
    let header = reader.parse_header()?;
    let tracks = reader.parse_tracks(&header)?;
    if tracks.len() != header.tracks as usize {
        tracing::warn!(
            "Header declares {} tracks, found {}",
            header.tracks,
            tracks.len()
        );
    }

    let midi_json = MidiJson::new(&header, tracks);

    let json_string = if args.compact {
        serde_json::to_string(&midi_json)?
    } else {
        serde_json::to_string_pretty(&midi_json)?
    };

    match args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}

/// Read a MIDI file, decompressing it when gzipped
fn read_midi_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?.read_to_end(&mut data)?;

    let gz_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if gz_extension || data.starts_with(&GZIP_MAGIC) {
        let mut decompressed = Vec::new();
        GzDecoder::new(data.as_slice()).read_to_end(&mut decompressed)?;
        Ok(decompressed)
    } else {
        Ok(data)
    }
}
