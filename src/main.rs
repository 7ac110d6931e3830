use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use subsieve::archive::{open_archive, select, EpisodeTarget};
use subsieve::detect::StatisticalDetector;
use subsieve::language::{default_resolver, TokenSource};
use subsieve::release::{extract, MediaHint};
use subsieve::{Config, Scanner, VideoMetadata};

#[derive(Parser)]
#[command(name = "subsieve", version, about = "Subtitle release matching and scoring")]
struct Args {
    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a release name
    Parse {
        release: String,
        /// Parse as a movie instead of an episode
        #[arg(long)]
        movie: bool,
    },
    /// Score releases against a video, best first
    Score {
        /// Video metadata as JSON
        #[arg(long)]
        video: PathBuf,
        #[arg(required = true)]
        releases: Vec<String>,
    },
    /// Resolve a language token
    Resolve {
        token: String,
        #[arg(long, value_enum, default_value_t = Source::Code)]
        source: Source,
        /// Subtitle filename, for detected tokens
        #[arg(long)]
        filename: Option<String>,
    },
    /// List the sidecar subtitles of a video file
    Scan { video_path: PathBuf },
    /// Extract the subtitle matching a video from an archive
    Select {
        archive: PathBuf,
        #[arg(long)]
        video: PathBuf,
        #[arg(long, requires = "episode")]
        season: Option<u32>,
        #[arg(long, requires = "season")]
        episode: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Source {
    Code,
    Name,
    Filename,
    Detected,
}

fn load_video(path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };

    match args.command {
        Command::Parse { release, movie } => {
            let hint = if movie { MediaHint::Movie } else { MediaHint::Episode };
            println!("{}", serde_json::to_string_pretty(&extract(&release, hint))?);
        }
        Command::Score { video, releases } => {
            let video = load_video(&video)?;
            let scorer = config.scorer();
            let max = scorer.weights_for(&video).total();
            let mut results: Vec<_> = releases
                .iter()
                .map(|release| {
                    let attrs = extract(release, video.hint());
                    let result = scorer.score(&attrs, &video);
                    serde_json::json!({
                        "release": release,
                        "score": result.score,
                        "max": max,
                        "matches": result.matches,
                    })
                })
                .collect();
            results.sort_by_key(|r| std::cmp::Reverse(r["score"].as_u64().unwrap_or(0)));
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        Command::Resolve {
            token,
            source,
            filename,
        } => {
            let source = match source {
                Source::Code => TokenSource::Code,
                Source::Name => TokenSource::Name,
                Source::Filename => TokenSource::Filename,
                Source::Detected => TokenSource::Detected {
                    filename: filename.unwrap_or_default(),
                },
            };
            let tag = default_resolver().resolve(&token, &source);
            println!("{}", serde_json::to_string_pretty(&tag)?);
        }
        Command::Scan { video_path } => {
            let scanner = Scanner::new(config.scanner.clone(), StatisticalDetector::new());
            let found: BTreeMap<String, _> = scanner
                .scan(&video_path, &BTreeMap::new())
                .into_iter()
                .map(|(path, tag)| (path.display().to_string(), tag))
                .collect();
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Command::Select {
            archive,
            video,
            season,
            episode,
        } => {
            let video = load_video(&video)?;
            let target = match (season, episode) {
                (Some(season), Some(episode)) => Some(EpisodeTarget::new(season, episode)),
                _ => EpisodeTarget::of(&video),
            };
            let mut archive = open_archive(fs::read(&archive)?)?;
            match select(archive.as_mut(), target, &video, &config.scorer())? {
                Some(bytes) => io::stdout().write_all(&bytes)?,
                None => {
                    eprintln!("No matching subtitle in archive");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
