use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "glitchfolio", version, about = "Glitch-art portfolio for the terminal")]
pub struct Config {
    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Seed the glitch generator for a reproducible animation.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "SMLDMS")]
    pub title: String,

    #[arg(long, default_value = crate::content::graphql::DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Skip loading the category navigation at start.
    #[arg(long, default_value_t = false)]
    pub no_nav: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub hud: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    /// Write logs here while the interactive session owns the terminal.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[arg(long, default_value_t = false)]
    pub list_categories: bool,

    #[arg(long, default_value_t = false)]
    pub list_projects: bool,

    /// Category slug filter for --list-projects.
    #[arg(long, requires = "list_projects")]
    pub category: Option<String>,

    /// Show the first N pages of --list-projects.
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Print one project by slug.
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
    Kitty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }
}

/// One-shot content queries that print and exit instead of starting the
/// interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentCommand {
    ListCategories,
    ListProjects { category: Option<String>, pages: usize },
    Project(String),
}

impl Config {
    pub fn content_command(&self) -> Option<ContentCommand> {
        if let Some(slug) = &self.project {
            return Some(ContentCommand::Project(slug.clone()));
        }
        if self.list_projects {
            return Some(ContentCommand::ListProjects {
                category: self.category.clone(),
                pages: self.page.max(1),
            });
        }
        self.list_categories.then_some(ContentCommand::ListCategories)
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs.max(1))
    }
}
