//! Projecthub CLI - community project directory

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use projecthub_core::certificate::render;
use projecthub_core::config::Config;
use projecthub_core::directory::{DirectoryController, DirectoryView, FetchOutcome};
use projecthub_core::domain::{
    FilterState, Identity, IdentityProvider, LocalIdentityProvider, Project, ProjectSubmission,
    mask,
};
use projecthub_core::selection::SelectionController;
use projecthub_core::storage::{FileSessionCache, JsonlProjectStore, ProjectStore};
use serde_json::json;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "projecthub")]
#[command(author, version, about = "Community project directory", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and submit projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Contributor statistics for the filtered project list
    Stats {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Render a completion certificate for a project you own
    Certificate {
        /// Project ID
        project_id: String,
        /// Output directory (defaults to certificate.output_dir)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Sign in as the given identity
    Signin {
        /// Identity ID
        id: String,
        /// Display name printed on certificates
        #[arg(short, long)]
        name: Option<String>,
        /// Email address
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the signed-in identity
    Signout,

    /// Show the signed-in identity
    Whoami,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Only projects in this location (VIRAR, VASAI, NAIGAON, MALAD, ANDHERI)
    #[arg(short, long)]
    location: Option<String>,
    /// Only projects in this category (Beach Cleaning, Public Resource Development, School Upgrades)
    #[arg(short, long)]
    category: Option<String>,
    /// Only projects you contribute to
    #[arg(long)]
    mine: bool,
}

impl FilterArgs {
    fn to_filters(&self) -> projecthub_core::Result<FilterState> {
        FilterState::from_inputs(
            self.location.as_deref().unwrap_or_default(),
            self.category.as_deref().unwrap_or_default(),
            self.mine,
        )
    }
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show project details
    Show { id: String },
    /// Submit a new project
    Submit {
        /// Project name
        #[arg(long)]
        name: String,
        /// Project description
        #[arg(long)]
        description: String,
        /// Category (Beach Cleaning, Public Resource Development, School Upgrades)
        #[arg(long)]
        category: String,
        /// Location
        #[arg(long)]
        location: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Duration in months
        #[arg(long)]
        duration: Option<String>,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

/// Store and identity provider wired from the loaded configuration
struct Context {
    config: Config,
    store: Arc<dyn ProjectStore>,
    identity: LocalIdentityProvider,
}

impl Context {
    fn load() -> anyhow::Result<Self> {
        let config = Config::load()?;
        let store_path = config.store_path()?;
        let session_path = config.session_path()?;
        debug!(store = %store_path.display(), session = %session_path.display(), "Loaded configuration");

        let store: Arc<dyn ProjectStore> = Arc::new(JsonlProjectStore::new(store_path));
        let identity = LocalIdentityProvider::new(Arc::new(FileSessionCache::new(session_path)))?;
        Ok(Self {
            config,
            store,
            identity,
        })
    }

    /// Fetch the directory for the given filters as the signed-in identity
    async fn directory(&self, filters: FilterState) -> anyhow::Result<DirectoryView> {
        let controller = DirectoryController::with_filters(self.store.clone(), filters);
        let outcome = controller.bind_identity(self.identity.subscribe()).await;
        controller.teardown().await;

        if let FetchOutcome::Failed { message, .. } = outcome? {
            return Err(projecthub_core::Error::QueryFailed(message).into());
        }
        Ok(controller.view())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so `--format json` output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("projecthub=info".parse()?)
                .add_directive("projecthub_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        report(&err);
        std::process::exit(1);
    }
    Ok(())
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<projecthub_core::Error>() {
        Some(core) => {
            eprintln!("Error [{}]: {}", core.code(), core);
            if let Some(suggestion) = core.suggestion() {
                eprintln!("  Try: {}", suggestion);
            }
        }
        None => eprintln!("Error: {:#}", err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Projects { action } => cmd_projects(&Context::load()?, action, format, quiet).await,

        Commands::Stats { filters } => cmd_stats(&Context::load()?, &filters, format, quiet).await,

        Commands::Certificate { project_id, out } => {
            cmd_certificate(&Context::load()?, &project_id, out, format, quiet).await
        }

        Commands::Signin { id, name, email } => {
            let mut identity = Identity::new(id);
            if let Some(name) = name {
                identity = identity.with_display_name(name);
            }
            if let Some(email) = email {
                identity = identity.with_email(email);
            }
            cmd_signin(&Context::load()?, identity, format, quiet).await
        }

        Commands::Signout => cmd_signout(&Context::load()?, quiet).await,

        Commands::Whoami => cmd_whoami(&Context::load()?, format),

        Commands::Config { action } => cmd_config(action, format, quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_projects(
    ctx: &Context,
    action: ProjectAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    match action {
        ProjectAction::List { filters } => {
            let view = ctx.directory(filters.to_filters()?).await?;

            if format == OutputFormat::Json {
                let projects = view
                    .projects
                    .iter()
                    .map(project_json)
                    .collect::<serde_json::Result<Vec<_>>>()?;
                println!("{}", serde_json::to_string_pretty(&projects)?);
                return Ok(());
            }

            if view.projects.is_empty() {
                if !quiet {
                    println!("No projects found.");
                    println!("\nSubmit one with: projecthub projects submit --name <name> ...");
                }
                return Ok(());
            }

            if !quiet {
                println!("Projects:");
            }
            for p in &view.projects {
                let owned = match &view.identity {
                    Some(identity) if p.is_owned_by(identity) => " [owner]",
                    _ => "",
                };
                println!(
                    "  {} - {} ({}, {}) [{}]{}",
                    p.id,
                    p.project_name,
                    p.category,
                    p.location,
                    p.urgency(),
                    owned
                );
            }
        }

        ProjectAction::Show { id } => {
            let view = ctx.directory(FilterState::default()).await?;
            let project = view
                .project(&id)
                .ok_or_else(|| projecthub_core::Error::ProjectNotFound(id.clone()))?;
            print_project(project, format)?;
        }

        ProjectAction::Submit {
            name,
            description,
            category,
            location,
            start_date,
            duration,
            image,
        } => {
            let submission = ProjectSubmission {
                project_name: name,
                project_description: description,
                category,
                location,
                start_date,
                duration,
                project_image: image,
            };
            let creator = ctx.identity.current();
            let record = submission.into_record(creator.as_ref(), chrono::Utc::now())?;
            let id = ctx.store.insert(record).await?;
            info!(project_id = %id, "Project submitted");

            if format == OutputFormat::Json {
                println!("{}", json!({ "id": id }));
            } else if quiet {
                println!("{}", id);
            } else {
                println!("Project submitted successfully!");
                println!("  ID: {}", id);
                if creator.is_none() {
                    println!("\nNot signed in: the project has no owner and no certificate can be issued.");
                }
            }
        }
    }

    Ok(())
}

/// JSON form of a project for output: derived urgency, masked contributors
fn project_json(p: &Project) -> serde_json::Result<serde_json::Value> {
    let mut value = serde_json::to_value(p)?;
    value["urgency"] = json!(p.urgency().as_str());
    value["contributors"] = json!(p.contributors.iter().map(|c| mask(c)).collect::<Vec<_>>());
    Ok(value)
}

fn print_project(p: &Project, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&project_json(p)?)?);
        return Ok(());
    }

    println!("Project: {}", p.project_name);
    println!("  ID: {}", p.id);
    println!("  Category: {}", p.category);
    println!("  Location: {}", p.location);
    println!("  Urgency: {}", p.urgency());
    if let Some(start) = p.start_date {
        println!("  Start date: {}", start);
    }
    if let Some(months) = p.duration {
        println!("  Duration: {} months", months);
    }
    if !p.project_description.is_empty() {
        println!("  Description: {}", p.project_description);
    }
    if !p.contributors.is_empty() {
        let masked: Vec<String> = p.contributors.iter().map(|c| mask(c)).collect();
        println!("  Contributors: {}", masked.join(", "));
    }
    println!("\n{}", p.summary());
    Ok(())
}

async fn cmd_stats(
    ctx: &Context,
    filters: &FilterArgs,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let view = ctx.directory(filters.to_filters()?).await?;
    let stats = &view.stats;

    if format == OutputFormat::Json {
        let contributors: Vec<_> = stats
            .contributors
            .iter()
            .map(|c| {
                json!({
                    "id": c.display_id(),
                    "projectCount": c.project_count,
                    "projectNames": c.project_names,
                })
            })
            .collect();
        let value = json!({
            "totalProjects": stats.total_projects,
            "uniqueContributorCount": stats.unique_contributor_count,
            "contributors": contributors,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Total projects: {}", stats.total_projects);
    println!("Unique contributors: {}", stats.unique_contributor_count);
    if quiet || stats.contributors.is_empty() {
        return Ok(());
    }

    println!("\nContributors:");
    for c in &stats.contributors {
        println!(
            "  {} - {} project(s): {}",
            c.display_id(),
            c.project_count,
            c.project_names.join(", ")
        );
    }
    Ok(())
}

async fn cmd_certificate(
    ctx: &Context,
    project_id: &str,
    out: Option<PathBuf>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let caller = ctx
        .identity
        .current()
        .ok_or(projecthub_core::Error::NotSignedIn)?;

    let view = ctx.directory(FilterState::default()).await?;
    let project = view
        .project(project_id)
        .cloned()
        .ok_or_else(|| projecthub_core::Error::ProjectNotFound(project_id.to_string()))?;

    let mut selection = SelectionController::new();
    selection.select(project);
    let request = selection.request_certificate(Some(&caller))?;
    let artifact = render(&request)?;

    let dir = out.unwrap_or_else(|| ctx.config.certificate.output_dir.clone());
    let path = artifact.save_to(&dir)?;
    selection.close_certificate()?;

    if format == OutputFormat::Json {
        let value = json!({
            "path": path.display().to_string(),
            "filename": artifact.filename(),
            "sizeBytes": artifact.size_bytes(),
            "sha256": artifact.sha256(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if quiet {
        println!("{}", path.display());
    } else {
        println!("Certificate saved to {}", path.display());
        println!("  Recipient: {}", request.recipient_display_name);
        println!("  Project: {}", request.project_title);
        println!("  Size: {} bytes", artifact.size_bytes());
        println!("  SHA-256: {}", artifact.sha256());
    }
    Ok(())
}

async fn cmd_signin(
    ctx: &Context,
    identity: Identity,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let identity = ctx.identity.sign_in(identity).await?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&identity)?);
    } else if !quiet {
        println!("Signed in as {}", identity.id);
        if identity.recipient_name().is_none() {
            println!("\nNo display name or email set: certificates cannot be issued.");
            println!("Sign in again with --name <name> to add one.");
        }
    }
    Ok(())
}

async fn cmd_signout(ctx: &Context, quiet: bool) -> anyhow::Result<()> {
    let was_signed_in = ctx.identity.current().is_some();
    ctx.identity.sign_out().await?;
    if !quiet {
        if was_signed_in {
            println!("Signed out.");
        } else {
            println!("Not signed in.");
        }
    }
    Ok(())
}

fn cmd_whoami(ctx: &Context, format: OutputFormat) -> anyhow::Result<()> {
    let current = ctx.identity.current();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&current)?);
        return Ok(());
    }

    match current {
        Some(identity) => {
            println!("ID: {}", identity.id);
            if let Some(name) = &identity.display_name {
                println!("Name: {}", name);
            }
            if let Some(email) = &identity.email {
                println!("Email: {}", email);
            }
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let entries = config.list()?;
            if format == OutputFormat::Json {
                let map: serde_json::Map<String, serde_json::Value> = entries
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::String(v)))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&map)?);
            } else {
                for (key, value) in entries {
                    println!("{} = {}", key, value);
                }
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}
