//! Turtle soup: a lateral-thinking riddle game with an AI host.
//!
//! - `play [--backend URL]` runs the terminal client (default). Without `--backend`
//!   an embedded proxy is started on a loopback port.
//! - `serve [--listen ADDR]` runs the completion proxy on its own.
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use std::path::PathBuf;
use turtle_soup::{
    app::App,
    client::ProxyClient,
    logging,
    scenario::Catalog,
    server,
    session::Session,
    settings::{Settings, get_game_data_dir},
};

#[derive(Parser)]
#[command(name = "turtle_soup")]
#[command(about = "Guess the story behind the riddle by asking yes/no questions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Settings file (defaults to ~/turtle_soup/data/settings.json)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play in the terminal
    Play {
        /// Use an already running proxy instead of an embedded one
        #[arg(short, long, env = "TURTLE_SOUP_BACKEND")]
        backend: Option<String>,
    },
    /// Run the completion proxy
    Serve {
        /// Address to listen on, overrides the settings file
        #[arg(short, long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let mut settings =
        Settings::load(cli.settings.as_deref()).wrap_err("Failed to load settings")?;
    let command = cli.command.unwrap_or(Commands::Play { backend: None });
    let is_server = matches!(command, Commands::Serve { .. });
    logging::init(get_game_data_dir()?, settings.debug_mode, is_server)
        .wrap_err("Failed to initialize logger")?;

    match command {
        Commands::Serve { listen } => {
            if let Some(listen) = listen {
                settings.listen = listen;
            }
            server::serve(&settings).await?;
        }
        Commands::Play { backend } => play(settings, backend).await?,
    }
    Ok(())
}

async fn play(settings: Settings, backend: Option<String>) -> Result<()> {
    let catalog = match &settings.scenarios_path {
        Some(path) => Catalog::load_from_file(path)
            .wrap_err_with(|| format!("Failed to load scenarios from {}", path.display()))?,
        None => Catalog::builtin()?,
    };
    log::info!("Loaded {} scenarios", catalog.len());

    let (base_url, embedded) = match backend {
        Some(url) => (url, None),
        None => {
            let (addr, handle) = server::spawn_embedded(&settings).await?;
            (format!("http://{addr}"), Some(handle))
        }
    };

    let client = ProxyClient::new(&base_url);
    let status = client.probe().await;
    let mut app = App::new(Session::new(settings.password.as_str()), catalog, client, status);
    let result = app.run().await;

    if let Some(handle) = embedded {
        handle.abort();
    }
    result
}
