//! Clap derive structures for the `yikang` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// yikang -- console for the corporate site and its content backend
#[derive(Debug, Parser)]
#[command(
    name = "yikang",
    version,
    about = "Manage the corporate site content backend from the command line",
    long_about = "Submit and browse public site content, run the admin screens \
        (news, product cases, inquiries, demo requests), trigger site \
        deploys, and seed a fresh backend.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "YIKANG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Project URL (overrides profile)
    #[arg(long, short = 'u', env = "YIKANG_URL", global = true)]
    pub url: Option<String>,

    /// Public anon key (overrides profile)
    #[arg(long, env = "YIKANG_ANON_KEY", global = true, hide_env = true)]
    pub anon_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "YIKANG_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "YIKANG_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "YIKANG_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a site location and open the matching mode
    Open(OpenArgs),

    /// Public site: published content and visitor submissions
    Site(SiteArgs),

    /// Sign in and out of the admin
    Auth(AuthArgs),

    /// Admin overview: counters and recent activity
    #[command(alias = "dash")]
    Dashboard,

    /// Manage company news
    News(NewsArgs),

    /// Manage product cases
    Cases(CasesArgs),

    /// Work through visitor inquiries
    Contacts(InboxArgs),

    /// Work through demo requests
    Demos(InboxArgs),

    /// Publish the site and review deploy history
    Deploy(DeployArgs),

    /// Upload an image and print its public URL
    Upload(UploadArgs),

    /// Seed a fresh backend with starter content
    Setup,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  OPEN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Path, fragment, or full URL (e.g. "/admin/news", "#setup", "/")
    #[arg(default_value = "/")]
    pub location: String,

    /// Print the resolved mode without contacting the backend
    #[arg(long)]
    pub resolve_only: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SITE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct SiteArgs {
    #[command(subcommand)]
    pub command: SiteCommand,
}

#[derive(Debug, Subcommand)]
pub enum SiteCommand {
    /// Published news, newest first
    News {
        /// Show every published item instead of the latest three
        #[arg(long, short = 'a')]
        all: bool,
    },

    /// Active product cases, newest first
    Cases {
        /// Max cases to show
        #[arg(long, short = 'l', default_value = "3")]
        limit: u32,
    },

    /// Submit a visitor inquiry
    Contact(ContactArgs),

    /// Request a product demo
    Demo(DemoArgs),
}

#[derive(Debug, Args)]
pub struct ContactArgs {
    /// Your name
    #[arg(long)]
    pub name: String,

    /// Contact phone
    #[arg(long)]
    pub phone: String,

    /// Hospital or institution
    #[arg(long)]
    pub hospital: Option<String>,

    /// Position or title
    #[arg(long)]
    pub position: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, short = 'm')]
    pub message: Option<String>,

    /// Product of interest (repeatable)
    #[arg(long = "interest", value_name = "PRODUCT")]
    pub interests: Vec<String>,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Contact person
    #[arg(long)]
    pub contact_name: String,

    /// Contact phone
    #[arg(long)]
    pub phone: String,

    /// Hospital or institution
    #[arg(long)]
    pub hospital: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    /// Product to demo
    #[arg(long)]
    pub product: Option<String>,

    /// Preferred time (free text)
    #[arg(long)]
    pub time: Option<String>,

    #[arg(long, short = 'm')]
    pub message: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in with email and password
    Login {
        /// Admin email (defaults to the profile's)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    #[command(alias = "whoami")]
    Status,

    /// Exchange the refresh token for a new session
    Refresh,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHARED LIST ARGUMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Client-side search and status filter for admin lists.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Status wire value, or "all"
    #[arg(long, short = 'f', default_value = "all")]
    pub status: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  NEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct NewsArgs {
    #[command(subcommand)]
    pub command: NewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum NewsCommand {
    /// List all news, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one item
    Get { id: i64 },

    /// Create a news item
    Create(NewsFields),

    /// Edit a news item (unset fields keep their value)
    Update {
        id: i64,
        #[command(flatten)]
        fields: NewsFields,
    },

    /// Delete a news item
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct NewsFields {
    #[arg(long, short = 't')]
    pub title: Option<String>,

    #[arg(long, short = 'c')]
    pub content: Option<String>,

    #[arg(long)]
    pub summary: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// draft, published, or archived
    #[arg(long)]
    pub status: Option<String>,

    /// Defaults to the signed-in user's email
    #[arg(long)]
    pub author: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CASES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CasesArgs {
    #[command(subcommand)]
    pub command: CasesCommand,
}

#[derive(Debug, Subcommand)]
pub enum CasesCommand {
    /// List all product cases, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one case
    Get { id: i64 },

    /// Create a product case
    Create(CaseFields),

    /// Edit a product case (unset fields keep their value)
    Update {
        id: i64,
        #[command(flatten)]
        fields: CaseFields,
    },

    /// Delete a product case
    #[command(alias = "rm")]
    Delete { id: i64 },
}

#[derive(Debug, Args)]
pub struct CaseFields {
    #[arg(long, short = 't')]
    pub title: Option<String>,

    #[arg(long)]
    pub hospital: Option<String>,

    #[arg(long)]
    pub product: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long)]
    pub result_summary: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// draft, active, or archived
    #[arg(long)]
    pub status: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTACTS / DEMOS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InboxArgs {
    #[command(subcommand)]
    pub command: InboxCommand,
}

#[derive(Debug, Subcommand)]
pub enum InboxCommand {
    /// List everything, newest first
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one entry with its status options
    Get { id: i64 },

    /// Move an entry to another status
    SetStatus {
        id: i64,
        /// Target status wire value
        status: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DEPLOY / UPLOAD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DeployArgs {
    #[command(subcommand)]
    pub command: DeployCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeployCommand {
    /// Deploy history and counters
    Logs,

    /// Publish the site now
    Trigger,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Image file (png, jpg, gif, webp, svg, bmp, avif; max 5 MB)
    pub file: PathBuf,

    /// Storage folder
    #[arg(long, default_value = "uploads")]
    pub folder: String,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Set a configuration value on the active profile
    Set {
        /// Config key (url, anon_key, anon_key_env, email, insecure, timeout, ca_cert)
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store the admin password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
