use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use plural_likes::{cli, config, error, state::AppState};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web front end and the background scheduler
    Serve(ServeOptions),

    /// Reconcile playlists once, right now
    Sync(SyncOptions),

    /// List signed-in users
    Users,

    /// Show the degree playlists of a user
    Degrees(DegreesOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Serve the web front end only, without periodic syncing
    #[clap(long)]
    pub no_scheduler: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SyncOptions {
    /// Only reconcile this user (session id of the token cache entry)
    #[clap(long)]
    pub user: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DegreesOptions {
    /// Session id of the token cache entry
    #[clap(long)]
    pub user: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let state = match config::Config::from_env() {
        Ok(config) => AppState::from_config(config),
        Err(e) => error!("Invalid configuration: {}", e),
    };

    match cli.command {
        Command::Serve(opt) => cli::serve(state, !opt.no_scheduler).await,
        Command::Sync(opt) => cli::sync(state, opt.user).await,
        Command::Users => cli::users(state).await,
        Command::Degrees(opt) => cli::degrees(state, opt.user).await,
        Command::Completions(_) => {}
    }
}
