use crate::cli::cli::{CategoryCommand, Cli, Commands, EntryArgs};
use crate::config::config::Config;
use crate::logging::{self, LogTarget};
use crate::tui;
use crate::vault::handlers::{CredentialOptions, Vault};
use clap::Parser;
use tracing::debug;

impl From<EntryArgs> for CredentialOptions {
    fn from(a: EntryArgs) -> Self {
        CredentialOptions {
            service: a.service,
            user: a.user,
            password: a.password,
            generate: a.generate,
            length: a.length,
            description: a.description,
            category: a.category,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::create(cli.data_dir.clone())?;

    if let Commands::Tui = cli.command {
        logging::init(
            &config,
            LogTarget::File(config.data_dir.join(logging::LOG_FILE_NAME)),
        )?;
        debug!(data_dir = %config.data_dir.display(), "launching tui");
        return tui::launch(&config).await;
    }

    logging::init(&config, LogTarget::Stderr)?;
    debug!(data_dir = %config.data_dir.display(), "config resolved");
    let vault = Vault::create(&config);

    match cli.command {
        Commands::List {
            category,
            query,
            json,
        } => vault.handle_list(category, query, json).await?,
        Commands::Show {
            id,
            reveal_password,
        } => vault.handle_show(&id, reveal_password).await?,
        Commands::Add(fields) => vault.handle_add(fields.into()).await?,
        Commands::Edit { id, fields } => vault.handle_edit(&id, fields.into()).await?,
        Commands::Rm { id, yes } => vault.handle_rm(&id, yes).await?,
        Commands::Copy { id, ttl } => vault.handle_copy(&id, ttl).await?,
        Commands::Generate { length } => vault.handle_generate(length).await?,
        Commands::Strength { password, json } => vault.handle_strength(&password, json)?,
        Commands::Stats { json } => vault.handle_stats(json).await?,
        Commands::Category(cmd) => match cmd {
            CategoryCommand::List { json } => vault.handle_category_list(json).await?,
            CategoryCommand::Add { name, icon } => vault.handle_category_add(name, icon).await?,
            CategoryCommand::Edit { id, name, icon } => {
                vault.handle_category_edit(&id, name, icon).await?
            }
            CategoryCommand::Rm { id, yes } => vault.handle_category_rm(&id, yes).await?,
        },
        Commands::Theme { action } => vault.handle_theme(action.is_some()).await?,
        Commands::Tui => {}
    }

    Ok(())
}
