use std::{path::PathBuf, sync::Arc};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sporvid::{cli, config, error, spotify::search::SelectionPolicy, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Print search queries, candidate artists and match scores
    #[clap(long, short, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Look up a single song on Spotify
    Search(SearchOptions),

    /// Score candidate artist names against an artist
    Match(MatchOptions),

    #[clap(about = "Create a playlist from videos")]
    Playlist(PlaylistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Artist name
    #[clap(long)]
    artist: String,

    /// Song title
    #[clap(long)]
    song: String,

    /// Report nothing instead of the top result when no artist matches
    #[clap(long)]
    strict: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct MatchOptions {
    /// Artist to match
    artist: String,

    /// Candidate artist names, in ranking order
    candidates: Vec<String>,

    /// Similarity cutoff between 0.0 and 1.0
    #[clap(long, value_parser = parse_threshold)]
    threshold: Option<f64>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistOptions {
    /// Playlist name
    #[clap(long)]
    name: String,

    /// Playlist description
    #[clap(long)]
    description: Option<String>,

    /// File with one video id or URL per line
    #[clap(long)]
    file: Option<PathBuf>,

    /// Skip songs whose search results match no artist
    #[clap(long)]
    strict: bool,

    /// Video ids or URLs
    videos: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn parse_threshold(raw: &str) -> Result<f64, String> {
    config::parse_threshold(raw)
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();
    if cli.verbose {
        sporvid::set_verbose(true);
    }

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Search(opt) => {
            cli::search(opt.artist, opt.song, SelectionPolicy::from_strict(opt.strict)).await
        },
        Command::Match(opt) => cli::compare(opt.artist, opt.candidates, opt.threshold),
        Command::Playlist(opt) => {
            cli::playlist(cli::PlaylistRequest {
                name: opt.name,
                description: opt.description,
                videos: opt.videos,
                file: opt.file,
                policy: SelectionPolicy::from_strict(opt.strict),
            })
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
