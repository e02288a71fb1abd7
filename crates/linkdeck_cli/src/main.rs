//! `linkdeck` command line front end.
//!
//! # Responsibility
//! - Map subcommands onto `DashboardStore`, share intake and theme operations.
//! - Own process setup: data dir, logging, database.
//!
//! Every mutating command persists through the store before printing.

mod config;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, DEFAULT_OEMBED_TIMEOUT_SECS};
use linkdeck_core::db::open_db;
use linkdeck_core::{
    card_icon, classify, enrich_draft, fetcher_or_noop, init_logging, share_intake, AppDraft,
    CardIcon, Confirmation, DashboardStore, HttpMetadataFetcher, KeyValueStore, LoadSource,
    MetadataFetcher, NoopMetadataFetcher, Section, SectionRepository, ShareOutcome, ShareParams,
    SqliteKeyValueStore, Theme, ThemeRepository,
};
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "linkdeck")]
#[command(version)]
#[command(about = "Local link launcher dashboard")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the database and logs (default: ./.linkdeck)
    #[arg(long, global = true, env = "LINKDECK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "LINKDECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Timeout for video metadata lookups
    #[arg(long, global = true, default_value_t = DEFAULT_OEMBED_TIMEOUT_SECS)]
    oembed_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Store(StoreCommand),

    /// Handle a link shared from another app
    Share {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        url: Option<String>,

        /// Raw `title=..&text=..&url=..` query; explicit flags take precedence
        #[arg(long)]
        query: Option<String>,
    },

    /// Show how a link would be previewed
    Classify { url: String },

    Theme {
        #[arg(value_enum, default_value = "show")]
        action: ThemeAction,
    },
}

/// Commands that operate on the loaded section store.
#[derive(Subcommand)]
enum StoreCommand {
    /// Print sections and apps, optionally filtered
    List {
        #[arg(short, long)]
        search: Option<String>,

        /// Print the (filtered) sections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a new section
    AddSection { title: String },

    RenameSection { id: i64, title: String },

    /// Delete a section and every app in it
    DeleteSection {
        id: i64,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Add an app to a section
    AddApp {
        section: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        url: String,

        #[arg(long, default_value = "")]
        icon: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Look up video title and author for empty fields
        #[arg(long)]
        fetch_info: bool,
    },

    /// Replace fields of an existing app; omitted fields keep their value
    EditApp {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    DeleteApp {
        id: i64,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Move an app to the end of another section
    MoveApp { id: i64, section: i64 },

    FindApp { id: i64 },

    /// Add a bare link to the last section
    Paste {
        url: String,

        /// Skip video metadata lookup
        #[arg(long)]
        offline: bool,
    },

    /// Replace all sections with a JSON backup
    Import { file: PathBuf },

    /// Write the JSON backup and/or the URL list
    Export {
        #[arg(long)]
        json: Option<PathBuf>,

        #[arg(long)]
        urls: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read current dir")?;
    let config = Config::resolve(
        cli.data_dir.as_deref(),
        cli.log_level.as_deref(),
        cli.oembed_timeout_secs,
        &cwd,
    )?;
    config.ensure_data_dir()?;

    let log_dir = config.log_dir();
    let log_dir = log_dir
        .to_str()
        .ok_or_else(|| anyhow!("log dir `{}` is not valid UTF-8", log_dir.display()))?;
    init_logging(&config.log_level, log_dir).map_err(|err| anyhow!(err))?;

    let conn = open_db(config.db_path())?;
    let kv = SqliteKeyValueStore::new(&conn);

    match cli.command {
        Commands::Share {
            title,
            text,
            url,
            query,
        } => share(kv, title, text, url, query),
        Commands::Classify { url } => {
            let preview = classify(&url);
            println!("{}", serde_json::to_string_pretty(&preview)?);
            Ok(())
        }
        Commands::Theme { action } => theme(kv, action),
        Commands::Store(command) => {
            let mut store = DashboardStore::load(SectionRepository::new(kv));
            match store.load_source() {
                LoadSource::Persisted => {}
                LoadSource::DefaultsSeeded => info!("event=cli_load module=cli source=defaults"),
                LoadSource::DefaultsRecovered => {
                    eprintln!("warning: stored sections were unreadable; defaults restored")
                }
                LoadSource::StorageUnavailable => {
                    eprintln!("warning: storage could not be read; changes will not be saved")
                }
            }
            dashboard(&mut store, command, &config)
        }
    }
}

fn dashboard<S: KeyValueStore>(
    store: &mut DashboardStore<S>,
    command: StoreCommand,
    config: &Config,
) -> Result<()> {
    match command {
        StoreCommand::List { search, json } => {
            let sections = store.filter(search.as_deref().unwrap_or_default());
            if json {
                println!("{}", serde_json::to_string_pretty(&sections)?);
            } else {
                print_sections(&sections);
            }
        }
        StoreCommand::AddSection { title } => {
            let section = store.add_section(&title)?;
            println!("added section {} {}", section.id, section.title);
        }
        StoreCommand::RenameSection { id, title } => {
            if !store.rename_section(id, &title) {
                bail!("section {id} not renamed (unknown id or blank title)");
            }
            println!("renamed section {id}");
        }
        StoreCommand::DeleteSection { id, yes } => {
            if store.section(id).is_none() {
                bail!("section {id} not found");
            }
            match store.delete_section(id, Confirmation::from_flag(yes)) {
                Some(section) => println!(
                    "deleted section {} with {} apps",
                    section.id,
                    section.apps.len()
                ),
                None => println!("not deleted; pass --yes to confirm"),
            }
        }
        StoreCommand::AddApp {
            section,
            name,
            url,
            icon,
            description,
            fetch_info,
        } => {
            let mut draft = AppDraft::new(name.unwrap_or_default(), url)
                .with_icon(icon)
                .with_description(description);
            if fetch_info {
                let fetcher = fetcher_or_noop(HttpMetadataFetcher::new(config.oembed_timeout));
                enrich_draft(&mut draft, fetcher.as_ref());
            }
            let app = store.add_app(section, draft)?;
            println!("added app {} {}", app.id, app.name);
        }
        StoreCommand::EditApp {
            id,
            name,
            url,
            icon,
            description,
        } => {
            let current = store
                .find_app(id)
                .map(|location| location.app.clone())
                .ok_or_else(|| anyhow!("app {id} not found"))?;
            let draft = AppDraft {
                name: name.unwrap_or(current.name),
                url: url.unwrap_or(current.url),
                icon: icon.unwrap_or(current.icon),
                description: description.unwrap_or(current.description),
            };
            store.edit_app(id, draft)?;
            println!("updated app {id}");
        }
        StoreCommand::DeleteApp { id, yes } => {
            if store.find_app(id).is_none() {
                bail!("app {id} not found");
            }
            match store.delete_app(id, Confirmation::from_flag(yes)) {
                Some(app) => println!("deleted app {} {}", app.id, app.name),
                None => println!("not deleted; pass --yes to confirm"),
            }
        }
        StoreCommand::MoveApp { id, section } => {
            store.move_app(id, section)?;
            println!("moved app {id} to section {section}");
        }
        StoreCommand::FindApp { id } => {
            let location = store
                .find_app(id)
                .ok_or_else(|| anyhow!("app {id} not found"))?;
            println!(
                "{}\t{}\tsection {} {}",
                location.app.name, location.app.url, location.section.id, location.section.title
            );
        }
        StoreCommand::Paste { url, offline } => {
            let fetcher: Box<dyn MetadataFetcher> = if offline {
                Box::new(NoopMetadataFetcher)
            } else {
                fetcher_or_noop(HttpMetadataFetcher::new(config.oembed_timeout))
            };
            let app = store.add_link_to_last_section(&url, fetcher.as_ref())?;
            println!("added app {} {}", app.id, app.name);
        }
        StoreCommand::Import { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let sections = store.import_snapshot(&raw)?;
            println!("imported {} sections", sections.len());
        }
        StoreCommand::Export { json, urls } => {
            let export = store.export_snapshot()?;
            if json.is_none() && urls.is_none() {
                println!("{}", export.json);
            }
            if let Some(path) = json {
                std::fs::write(&path, &export.json)
                    .with_context(|| format!("failed to write `{}`", path.display()))?;
                println!("wrote {}", path.display());
            }
            if let Some(path) = urls {
                std::fs::write(&path, &export.url_list)
                    .with_context(|| format!("failed to write `{}`", path.display()))?;
                println!("wrote {}", path.display());
            }
        }
    }
    Ok(())
}

fn share(
    kv: SqliteKeyValueStore<'_>,
    title: Option<String>,
    text: Option<String>,
    url: Option<String>,
    query: Option<String>,
) -> Result<()> {
    let from_query = query
        .as_deref()
        .map(ShareParams::from_query)
        .unwrap_or_default();
    let params = ShareParams {
        title: title.or(from_query.title),
        text: text.or(from_query.text),
        url: url.or(from_query.url),
    };

    let outcome = share_intake(&params, &SectionRepository::new(kv));
    match &outcome {
        ShareOutcome::NothingShared => println!("nothing to share"),
        ShareOutcome::StoreUnreadable(reason) => {
            eprintln!("warning: stored sections unreadable, link not saved: {reason}")
        }
        ShareOutcome::Added { app, persisted } => {
            println!("shared {} {}", app.id, app.name);
            if !persisted {
                eprintln!("warning: link could not be saved");
            }
        }
    }
    println!("redirect {}", outcome.redirect_target());
    Ok(())
}

fn theme(kv: SqliteKeyValueStore<'_>, action: ThemeAction) -> Result<()> {
    let themes = ThemeRepository::new(kv);
    let theme = match action {
        ThemeAction::Show => themes.load(),
        ThemeAction::Toggle => themes.toggle(),
        ThemeAction::Light | ThemeAction::Dark => {
            let theme = if action == ThemeAction::Light {
                Theme::Light
            } else {
                Theme::Dark
            };
            if !themes.save(theme) {
                bail!("failed to save theme");
            }
            theme
        }
    };
    println!("{theme}");
    Ok(())
}

fn print_sections(sections: &[Section]) {
    for section in sections {
        println!("[{}] {}", section.id, section.title);
        for app in &section.apps {
            println!(
                "  {}  {}  {}  ({})",
                app.id,
                app.name,
                app.url,
                icon_label(&card_icon(app))
            );
            if !app.description.is_empty() {
                println!("      {}", app.description);
            }
        }
    }
}

fn icon_label(icon: &CardIcon) -> String {
    match icon {
        CardIcon::EmbeddedImage(_) => "image".to_string(),
        CardIcon::ClassToken(token) | CardIcon::Glyph(token) => token.clone(),
        CardIcon::Thumbnail { kind, .. } => format!("{} thumbnail", kind.as_str()),
        CardIcon::FileKind(token) => (*token).to_string(),
    }
}
