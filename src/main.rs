//! Lectern Ops CLI
//!
//! Command-line interface for platform operations:
//! - List, onboard, suspend and reactivate organizations
//! - Inspect users across tenants
//! - Read and flip feature flags
//! - Show platform status
//!
//! `--offline` runs every command against a seeded in-memory backend,
//! which is how the demo environment works without a hosted project.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use lectern::backend::{
    AuthApi, MemoryBackend, MemoryProvisioner, OrgProvisioner, RestBackend, RestProvisioner,
    Tables,
};
use lectern::config::{generate_default_config, Config};
use lectern::model::{OrgStatus, Organization, PlanType, Role};
use lectern::service::{
    sample_results, FlagBoard, OrgDirectory, OrgOnboarding, OrgQuery, PlatformStats,
    UserDirectory, UserQuery,
};

#[derive(Parser)]
#[command(name = "lectern")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Ops console for the Lectern education platform")]
#[command(
    long_about = "Lectern is a multi-tenant education platform.\nThis CLI performs the console's admin operations from the terminal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path (default: standard locations)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run against a seeded in-memory backend instead of a hosted one
    #[arg(long, global = true)]
    offline: bool,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Organization operations
    Orgs {
        #[command(subcommand)]
        command: OrgsCommand,
    },

    /// User operations
    Users {
        #[command(subcommand)]
        command: UsersCommand,
    },

    /// Feature flag operations
    Flags {
        #[command(subcommand)]
        command: FlagsCommand,
    },

    /// Show platform status
    Status {
        /// Narrow the counts to one organization
        #[arg(long)]
        org: Option<Uuid>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum OrgsCommand {
    /// List organizations
    List {
        /// Match name or slug, case-insensitive
        #[arg(short, long)]
        search: Option<String>,
        /// Filter by status (active, suspended, inactive)
        #[arg(long)]
        status: Option<String>,
    },

    /// Create an organization and provision its first admin
    Onboard {
        /// Organization name
        name: String,
        /// Email for the initial org admin
        admin_email: String,
        /// Plan (free, standard, premium)
        #[arg(long, default_value = "free")]
        plan: String,
    },

    /// Suspend an active organization
    Suspend {
        /// Organization id
        id: Uuid,
    },

    /// Reactivate a suspended or inactive organization
    Activate {
        /// Organization id
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List users
    List {
        /// Restrict to one organization
        #[arg(long)]
        org: Option<Uuid>,
        /// Filter by role (super_admin, org_admin, teacher, student)
        #[arg(long)]
        role: Option<String>,
        /// Match name or email, case-insensitive
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
enum FlagsCommand {
    /// List feature flags
    List,

    /// Turn a flag on or off
    Set {
        /// Flag key, e.g. omr_scanning
        key: String,
        /// true or false
        enabled: bool,
    },
}

/// The transports a command runs against
struct Ops {
    tables: Arc<dyn Tables>,
    provisioner: Arc<dyn OrgProvisioner>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let Cli {
        command,
        config,
        offline,
        format,
    } = Cli::parse();

    let config = match config.as_deref() {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {path:?}"))?,
        None => Config::load_default(),
    };
    init_logging(&config);

    match command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{content}"),
            }
        }

        command => {
            let ops = connect(offline, &config).await?;
            run(command, &ops, &format).await?;
        }
    }

    Ok(())
}

async fn run(command: Commands, ops: &Ops, format: &str) -> anyhow::Result<()> {
    match command {
        Commands::Orgs { command } => run_orgs(command, ops, format).await?,
        Commands::Users { command } => run_users(command, ops, format).await?,
        Commands::Flags { command } => run_flags(command, ops, format).await?,

        Commands::Status { org } => {
            let stats = PlatformStats::new(ops.tables.clone());
            let snapshot = stats.snapshot(org).await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                println!("Lectern v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("Organizations: {}", snapshot.organizations);
                println!("Users:         {}", snapshot.users);
                println!("Courses:       {}", snapshot.courses);
                println!("Streams:       {}", snapshot.streams);
            }
        }

        // Handled before connect()
        Commands::Config { .. } => unreachable!(),
    }
    Ok(())
}

async fn run_orgs(command: OrgsCommand, ops: &Ops, format: &str) -> anyhow::Result<()> {
    let directory = OrgDirectory::new(ops.tables.clone());

    match command {
        OrgsCommand::List { search, status } => {
            let mut query = OrgQuery::new();
            if let Some(text) = search {
                query = query.search(text);
            }
            if let Some(s) = status {
                let status = parse_org_status(&s)?;
                query = query.status(status);
            }

            let orgs = directory.list(&query).await?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&orgs)?);
            } else if orgs.is_empty() {
                println!("No organizations found.");
            } else {
                println!("{:<38} {:<28} {:<10} {}", "ID", "Name", "Plan", "Status");
                println!("{}", "-".repeat(86));
                for org in orgs {
                    println!(
                        "{:<38} {:<28} {:<10} {}",
                        org.id,
                        org.name,
                        org.plan_type.label(),
                        org.status.label()
                    );
                }
            }
        }

        OrgsCommand::Onboard {
            name,
            admin_email,
            plan,
        } => {
            let plan = PlanType::parse(&plan)
                .with_context(|| format!("unknown plan {plan:?}, use free/standard/premium"))?;

            let onboarding = OrgOnboarding::new(ops.tables.clone(), ops.provisioner.clone());
            let onboarded = onboarding.onboard(&name, plan, &admin_email).await?;

            println!("Onboarded {} ({})", onboarded.org.name, onboarded.org.slug);
            println!("  ID:    {}", onboarded.org.id);
            println!("  Plan:  {}", onboarded.org.plan_type.label());
            println!();
            println!("Initial admin credentials (shown once, store them now):");
            println!("  Email:    {}", onboarded.credentials.email);
            println!("  Password: {}", onboarded.credentials.one_time_password);
        }

        OrgsCommand::Suspend { id } => {
            let org = require_org(&directory, id).await?;
            if org.status == OrgStatus::Suspended {
                println!("{} is already suspended.", org.name);
            } else {
                let after = directory.toggle_status(&org).await?;
                println!("{} is now {}.", after.name, after.status.label());
            }
        }

        OrgsCommand::Activate { id } => {
            let org = require_org(&directory, id).await?;
            if org.status == OrgStatus::Active {
                println!("{} is already active.", org.name);
            } else {
                let after = directory.toggle_status(&org).await?;
                println!("{} is now {}.", after.name, after.status.label());
            }
        }
    }
    Ok(())
}

async fn run_users(command: UsersCommand, ops: &Ops, format: &str) -> anyhow::Result<()> {
    match command {
        UsersCommand::List { org, role, search } => {
            let mut query = UserQuery::new();
            if let Some(org) = org {
                query = query.org(org);
            }
            if let Some(r) = role {
                let role = Role::parse(&r).with_context(|| format!("unknown role {r:?}"))?;
                query = query.role(role);
            }
            if let Some(text) = search {
                query = query.search(text);
            }

            let directory = UserDirectory::new(ops.tables.clone());
            let users = directory.list(&query).await?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                println!("No users found.");
            } else {
                println!(
                    "{:<38} {:<24} {:<28} {:<12} {}",
                    "ID", "Name", "Email", "Role", "Status"
                );
                println!("{}", "-".repeat(112));
                for user in users {
                    println!(
                        "{:<38} {:<24} {:<28} {:<12} {}",
                        user.id,
                        user.full_name,
                        user.email,
                        user.role.label(),
                        user.status.label()
                    );
                }
            }
        }
    }
    Ok(())
}

async fn run_flags(command: FlagsCommand, ops: &Ops, format: &str) -> anyhow::Result<()> {
    let board = FlagBoard::new(ops.tables.clone());

    match command {
        FlagsCommand::List => {
            let flags = board.list().await?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&flags)?);
            } else if flags.is_empty() {
                println!("No feature flags defined.");
            } else {
                println!("{:<24} {:<8} {}", "Key", "On", "Description");
                println!("{}", "-".repeat(64));
                for flag in flags {
                    println!(
                        "{:<24} {:<8} {}",
                        flag.key,
                        if flag.enabled { "yes" } else { "no" },
                        flag.description.as_deref().unwrap_or("-")
                    );
                }
            }
        }

        FlagsCommand::Set { key, enabled } => {
            let flag = board.set(&key, enabled).await?;
            println!(
                "{} is now {}",
                flag.key,
                if flag.enabled { "on" } else { "off" }
            );
        }
    }
    Ok(())
}

async fn connect(offline: bool, config: &Config) -> anyhow::Result<Ops> {
    if offline {
        let backend = Arc::new(MemoryBackend::new());
        seed_demo(&backend);
        tracing::info!("Running offline against seeded in-memory backend");
        return Ok(Ops {
            tables: backend,
            provisioner: Arc::new(MemoryProvisioner::new()),
        });
    }

    let backend = Arc::new(RestBackend::new(config.backend.to_rest_config()));
    tracing::info!("Backend: {}", config.backend.url);

    // Writes need a signed-in operator; reads work with the anon key
    if let (Ok(email), Ok(password)) = (
        std::env::var("LECTERN_EMAIL"),
        std::env::var("LECTERN_PASSWORD"),
    ) {
        backend
            .sign_in_with_password(&email, &password)
            .await
            .context("operator sign-in failed")?;
        tracing::info!("Signed in as {}", email);
    }

    let provisioner = Arc::new(RestProvisioner::new(
        config.provisioner.url.clone(),
        config.provisioner.request_timeout_ms,
    ));
    Ok(Ops {
        tables: backend,
        provisioner,
    })
}

async fn require_org(directory: &OrgDirectory, id: Uuid) -> anyhow::Result<Organization> {
    match directory.get(id).await? {
        Some(org) => Ok(org),
        None => bail!("no organization with id {id}"),
    }
}

fn parse_org_status(s: &str) -> anyhow::Result<OrgStatus> {
    match s.to_lowercase().as_str() {
        "active" => Ok(OrgStatus::Active),
        "suspended" => Ok(OrgStatus::Suspended),
        "inactive" => Ok(OrgStatus::Inactive),
        other => bail!("unknown status {other:?}, use active/suspended/inactive"),
    }
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lectern={}", config.logging.level)),
    );

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Demo data for offline mode
fn seed_demo(backend: &MemoryBackend) {
    use serde_json::json;

    let horizon: Uuid = "7a1e2b3c-4d5e-4f60-8a7b-9c0d1e2f3a4b".parse().unwrap();
    let sunrise: Uuid = "8b2f3c4d-5e6f-4071-9b8c-0d1e2f3a4b5c".parse().unwrap();

    backend.seed(
        "organizations",
        vec![
            json!({
                "id": horizon,
                "name": "Horizon Academy",
                "slug": "horizon-academy",
                "status": "active",
                "plan_type": "premium",
                "max_users": 500,
                "created_at": "2026-01-10T08:00:00Z"
            }),
            json!({
                "id": sunrise,
                "name": "Sunrise Coaching Centre",
                "slug": "sunrise-coaching-centre",
                "status": "suspended",
                "plan_type": "free",
                "created_at": "2026-02-01T08:00:00Z"
            }),
        ],
    );

    backend.seed(
        "users",
        vec![
            json!({
                "id": Uuid::new_v4(),
                "full_name": "Meera Raghavan",
                "email": "meera@lectern.test",
                "role": "super_admin",
                "status": "active",
                "created_at": "2026-01-01T08:00:00Z"
            }),
            json!({
                "id": Uuid::new_v4(),
                "full_name": "Anil Kapoor",
                "email": "anil@horizon.test",
                "role": "org_admin",
                "status": "active",
                "org_id": horizon,
                "created_at": "2026-01-11T08:00:00Z"
            }),
            json!({
                "id": Uuid::new_v4(),
                "full_name": "Priya Iyer",
                "email": "priya@horizon.test",
                "role": "teacher",
                "status": "active",
                "org_id": horizon,
                "created_at": "2026-01-12T08:00:00Z"
            }),
        ],
    );

    backend.seed(
        "courses",
        vec![json!({
            "id": Uuid::new_v4(),
            "org_id": horizon,
            "title": "Physics XII",
            "status": "published",
            "created_at": "2026-01-15T08:00:00Z"
        })],
    );
    backend.provision("streams");

    backend.seed(
        "feature_flags",
        vec![
            json!({
                "id": Uuid::new_v4(),
                "key": "live_streaming",
                "description": "Live classes and stream chat",
                "enabled": true
            }),
            json!({
                "id": Uuid::new_v4(),
                "key": "omr_scanning",
                "description": "Answer-sheet scanning pipeline",
                "enabled": false
            }),
        ],
    );

    let results: Vec<serde_json::Value> = sample_results()
        .iter()
        .filter_map(|r| serde_json::to_value(r).ok())
        .collect();
    backend.seed("omr_results", results);
}
