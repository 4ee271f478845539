use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use coverart_core::extraction::cover_art_coordinator::CoverArtCoordinator;
use coverart_core::extraction::domain::artwork_extractor::ArtworkExtractor;
use coverart_core::extraction::infrastructure::channel_artwork_sink::ChannelArtworkSink;
use coverart_core::extraction::infrastructure::parser_artwork_extractor::ParserArtworkExtractor;
use coverart_core::extraction::metadata_extractor::MetadataExtractor;
use coverart_core::shared::artwork_image::ArtworkImage;
use coverart_core::shared::tag_record::TagRecord;

/// Cover art and tag inspection for audio files.
#[derive(Parser)]
#[command(name = "coverart", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the normalized tags of a file.
    Info {
        file: PathBuf,

        /// Print as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Decode the embedded cover art of a file.
    Art {
        file: PathBuf,

        /// Write the decoded artwork to this PNG file.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Request artwork for each file in quick succession, as a player does
    /// while the user skips through tracks; only the last one is applied.
    Browse {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Info { file, json } => {
            validate_input(&file)?;
            run_info(&file, json)
        }
        Command::Art { file, output } => {
            validate_input(&file)?;
            run_art(&file, output.as_deref())
        }
        Command::Browse { files } => {
            for file in &files {
                validate_input(file)?;
            }
            run_browse(&files)
        }
    }
}

fn validate_input(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    Ok(())
}

fn run_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let record = MetadataExtractor::new().extract_tags(file);
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_record(file, &record);
    }
    Ok(())
}

fn print_record(file: &Path, record: &TagRecord) {
    println!("{}", file.display());
    let fields = [
        ("Title", &record.title),
        ("Artist", &record.artist),
        ("Album", &record.album),
        ("Track", &record.track),
        ("Year", &record.year),
        ("Genre", &record.genre),
        ("Comment", &record.comment),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            println!("  {label:<8} {value}");
        }
    }
    println!("  {:<8} {}", "Length", format_duration(record.duration));
    if let Some(bitrate) = &record.bitrate {
        println!("  {:<8} {bitrate} kbps", "Bitrate");
    }
}

fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

fn run_art(file: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let artwork = ParserArtworkExtractor::new()
        .extract(file)
        .ok_or_else(|| format!("No decodable artwork in {}", file.display()))?;

    println!("{}", describe(&artwork));

    if let Some(output) = output {
        let buffer = artwork
            .into_rgba_image()
            .ok_or("Decoded artwork has inconsistent dimensions")?;
        buffer.save_with_format(output, image::ImageFormat::Png)?;
        log::info!("Wrote artwork to {}", output.display());
    }
    Ok(())
}

fn describe(image: &ArtworkImage) -> String {
    let (w, h) = image.dimensions();
    match image.average_rgba() {
        Some([r, g, b, _]) => format!("{w}x{h}, average color #{r:02x}{g:02x}{b:02x}"),
        None => format!("{w}x{h}"),
    }
}

fn run_browse(files: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = crossbeam_channel::unbounded();
    let coordinator = CoverArtCoordinator::new(
        Arc::new(ParserArtworkExtractor::new()),
        Arc::new(ChannelArtworkSink::new(tx)),
        ArtworkImage::placeholder(),
    );

    let handles: Vec<_> = files
        .iter()
        .filter_map(|file| {
            log::info!("Requesting artwork for {}", file.display());
            coordinator.request(Some(file.as_path()))
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            return Err("Artwork extraction thread panicked".into());
        }
    }
    drop(coordinator);

    for update in rx.try_iter() {
        let file = update
            .file
            .as_deref()
            .map(|f| f.display().to_string())
            .unwrap_or_else(|| "<none>".to_string());
        let kind = if update.is_default { "default" } else { "embedded" };
        println!("{file}: {kind} artwork, {}", describe(&update.image));
    }
    Ok(())
}
