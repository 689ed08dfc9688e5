use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use anidb_udp_cli::config::{AppConfig, ConfigManager};
use anidb_udp_cli::lookup::{parse_anime_ref, parse_group_ref};
use anidb_udp_cli::{output, session, shell};
use anidb_udp_core::AniDbClient;
use anidb_udp_core::ed2k;
use anidb_udp_core::protocol::{EpisodeQuery, FileQuery};

#[derive(Parser)]
#[command(name = "anidb-udp")]
#[command(author, version, about = "AniDB UDP API client", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Use this configuration file instead of the default one
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send raw commands interactively
    Shell {
        /// Log in first and print the session key
        #[arg(long)]
        login: bool,
    },

    /// Look up an anime by id or name
    Anime {
        /// Anime id or exact name
        anime: String,

        /// Fields to request (comma separated, default: all)
        #[arg(short, long, value_delimiter = ',')]
        fields: Vec<String>,
    },

    /// Fetch the full description of an anime
    Description {
        /// Anime id
        aid: u64,
    },

    /// Look up an episode by id, or by anime and episode number
    Episode {
        /// Episode id
        #[arg(conflicts_with_all = ["anime", "epno"])]
        eid: Option<u64>,

        /// Anime id or name
        #[arg(long, requires = "epno")]
        anime: Option<String>,

        /// Episode number, e.g. 5 or S1
        #[arg(long, requires = "anime")]
        epno: Option<String>,
    },

    /// Look up a file
    File(FileArgs),

    /// Look up a release group
    Group {
        /// Group id
        gid: u64,
    },

    /// Show which groups released an anime
    GroupStatus {
        /// Anime id
        aid: u64,
    },

    /// Look up a character
    Character {
        /// Character id
        charid: u64,
    },

    /// Look up a creator
    Creator {
        /// Creator id
        creatorid: u64,
    },

    /// Calculate the ed2k hash of files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args)]
struct FileArgs {
    /// File id
    #[arg(conflicts_with_all = ["path", "size", "anime"])]
    fid: Option<u64>,

    /// Hash a local file and look it up by size and ed2k
    #[arg(long, conflicts_with_all = ["size", "anime"])]
    path: Option<PathBuf>,

    /// File size in bytes
    #[arg(long, requires = "ed2k", conflicts_with = "anime")]
    size: Option<u64>,

    /// ed2k hash
    #[arg(long, requires = "size")]
    ed2k: Option<String>,

    /// Anime id or name
    #[arg(long, requires_all = ["group", "epno"])]
    anime: Option<String>,

    /// Group id or name
    #[arg(long, requires = "anime")]
    group: Option<String>,

    /// Episode number
    #[arg(long, requires = "anime")]
    epno: Option<String>,

    /// File fields to request (comma separated, default: all)
    #[arg(short, long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Anime fields to request (comma separated, default: all)
    #[arg(long, value_delimiter = ',')]
    anime_fields: Vec<String>,
}

impl FileArgs {
    fn query(&self) -> Result<FileQuery> {
        if let Some(fid) = self.fid {
            return Ok(FileQuery::Id(fid));
        }
        if let Some(path) = &self.path {
            let (size, ed2k) = ed2k::hash_file(path)
                .with_context(|| format!("Failed to hash {}", path.display()))?;
            log::debug!("{}: {size} bytes, ed2k {ed2k}", path.display());
            return Ok(FileQuery::Hash { size, ed2k });
        }
        if let (Some(size), Some(ed2k)) = (self.size, &self.ed2k) {
            return Ok(FileQuery::Hash {
                size,
                ed2k: ed2k.clone(),
            });
        }
        if let (Some(anime), Some(group), Some(epno)) = (&self.anime, &self.group, &self.epno) {
            return Ok(FileQuery::Episode {
                anime: parse_anime_ref(anime),
                group: parse_group_ref(group),
                epno: epno.clone(),
            });
        }
        anyhow::bail!("Give a file id, --path, --size with --ed2k, or --anime with --group and --epno")
    }
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Get a configuration value
    Get {
        /// Configuration key (e.g., client.pacing_ms)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., client.pacing_ms)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration values
    List,

    /// Print the configuration file path
    Path,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("anidb_udp_core", log::LevelFilter::Debug)
            .filter_module("anidb_udp_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let manager = match cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };

    match cli.command {
        Commands::Config { command } => config_command(manager, command),
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
        Commands::Hash { paths, format } => hash_command(&paths, format),
        Commands::Shell { login } => {
            let config = manager.load()?;
            shell_command(&config, login).await
        }
        command => {
            let config = manager.load()?;
            let client = session::login(&config).await?;
            let outcome = fetch_command(&client, command).await;
            if let Err(e) = client.close().await {
                log::warn!("Failed to close the connection: {e}");
            }
            outcome
        }
    }
}

async fn fetch_command(client: &AniDbClient, command: Commands) -> Result<()> {
    match command {
        Commands::Anime { anime, fields } => {
            let fields: Vec<&str> = fields.iter().map(String::as_str).collect();
            let record = client.anime(parse_anime_ref(&anime), &fields).await?;
            output::print(record, "Anime")
        }
        Commands::Description { aid } => {
            match client.anime_description(aid).await? {
                Some(text) => println!("{text}"),
                None => println!("{}", "Description not found".yellow()),
            }
            Ok(())
        }
        Commands::Episode { eid, anime, epno } => {
            let query = match (eid, anime, epno) {
                (Some(eid), _, _) => EpisodeQuery::Id(eid),
                (None, Some(anime), Some(epno)) => EpisodeQuery::Number {
                    anime: parse_anime_ref(&anime),
                    epno,
                },
                _ => anyhow::bail!("Give an episode id, or --anime with --epno"),
            };
            output::print(client.episode(query).await?, "Episode")
        }
        Commands::File(args) => {
            let query = args.query()?;
            let fields: Vec<&str> = args.fields.iter().map(String::as_str).collect();
            let anime_fields: Vec<&str> = args.anime_fields.iter().map(String::as_str).collect();
            output::print_file(client.file(query, &fields, &anime_fields).await?)
        }
        Commands::Group { gid } => output::print(client.group(gid).await?, "Group"),
        Commands::GroupStatus { aid } => {
            output::print(client.group_status(aid).await?, "Group status")
        }
        Commands::Character { charid } => {
            output::print(client.character(charid).await?, "Character")
        }
        Commands::Creator { creatorid } => {
            output::print(client.creator(creatorid).await?, "Creator")
        }
        _ => anyhow::bail!("Not a lookup command"),
    }
}

async fn shell_command(config: &AppConfig, login: bool) -> Result<()> {
    let client = if login {
        let client = session::login(config).await?;
        if let Some(key) = client.state().await.session() {
            eprintln!("Session: {}", key.cyan());
        }
        client
    } else {
        session::connect(config).await?
    };

    eprintln!(
        "{}",
        format!("Connected to {}. Type {} to quit.", config.client.server, shell::QUIT).bold()
    );

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let outcome = shell::run(&client, input, std::io::stdout()).await;
    client.close().await?;
    outcome
}

fn hash_command(paths: &[PathBuf], format: OutputFormat) -> Result<()> {
    let mut results = Vec::with_capacity(paths.len());
    for path in paths {
        let (size, hash) = ed2k::hash_file(path)
            .with_context(|| format!("Failed to hash {}", path.display()))?;
        results.push((path, size, hash));
    }

    match format {
        OutputFormat::Text => {
            for (path, size, hash) in &results {
                println!("{}: {} {}", "ED2K".yellow(), hash.cyan(), size);
                if paths.len() > 1 {
                    println!("  {}", path.display());
                }
            }
        }
        OutputFormat::Json => {
            let json: Vec<_> = results
                .iter()
                .map(|(path, size, hash)| {
                    serde_json::json!({
                        "file": path.display().to_string(),
                        "size": size,
                        "ed2k": hash,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

fn config_command(mut manager: ConfigManager, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            println!("{}", manager.get(&key)?);
        }
        ConfigCommand::Set { key, value } => {
            manager.set(&key, &value)?;
            eprintln!("{}", format!("Set {key}").green());
            eprintln!(
                "Configuration saved to: {}",
                manager.get_config_path().display()
            );
        }
        ConfigCommand::List => {
            eprintln!("Config file: {}", manager.get_config_path().display());
            for (key, value) in manager.list()? {
                println!("{} = {}", key.cyan(), value);
            }
        }
        ConfigCommand::Path => {
            println!("{}", manager.get_config_path().display());
        }
    }

    Ok(())
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut std::io::stdout());
}
