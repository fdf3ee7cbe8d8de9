use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{check_command, debug_command, languages_command, reset_command, watch_command};
use crate::host::HostOptions;

#[derive(Parser, Debug)]
#[command(name = "debugfile")]
#[command(version, about, long_about = None, propagate_version = true)]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug            Enable debug logging\n    DEBUGFILE_LOCALE=zh-cn    Message language")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Editor command used to list and install extensions
    #[arg(long, global = true, env = "DEBUGFILE_EDITOR", default_value = "code")]
    pub editor: String,

    /// Do not query the marketplace for extension names
    #[arg(long, global = true)]
    pub offline: bool,

    /// Directory holding the global settings.json
    #[arg(long, global = true, env = "DEBUGFILE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Directory with package.nls*.json bundles overriding the built-in messages
    #[arg(long, global = true, env = "DEBUGFILE_NLS_DIR")]
    pub nls_dir: Option<PathBuf>,
}

impl GlobalArgs {
    pub fn host_options(&self, workspace: Option<PathBuf>, language: Option<String>) -> HostOptions {
        HostOptions {
            workspace,
            language,
            editor: self.editor.clone(),
            offline: self.offline,
            config_dir: self.config_dir.clone(),
            nls_dir: self.nls_dir.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Debug a file with the provider for its language
    #[command(visible_alias = "d")]
    Debug {
        /// The file to debug
        file: PathBuf,

        /// Workspace folder (defaults to the nearest directory with a project marker)
        #[arg(short, long)]
        workspace: Option<PathBuf>,

        /// Language id instead of detecting it (e.g. python, rust)
        #[arg(short, long)]
        language: Option<String>,

        /// JSON file with launch configuration fields to merge over the template
        #[arg(short, long)]
        overrides: Option<PathBuf>,

        /// Print the resolved provider without checking extensions or launching
        #[arg(short, long)]
        dry_run: bool,

        /// Arguments passed to the debugged program
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// List the languages that have a debug provider
    #[command(visible_alias = "ls")]
    Languages,
    /// Check that the extensions needed to debug a file are installed
    Check {
        file: PathBuf,

        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// Check extensions for every supported file created or changed under a directory
    Watch {
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
    /// Forget skipped and already offered extensions
    Reset {
        /// Clear the global lists instead of the project's
        #[arg(short, long)]
        global: bool,

        /// Project folder (defaults to the current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
}

impl Cli {
    /// Execute the command
    pub fn execute(self) -> Result<()> {
        let global = self.global;
        match self.command {
            Commands::Debug {
                file,
                workspace,
                language,
                overrides,
                dry_run,
                args,
            } => debug_command(
                &global.host_options(workspace, language),
                &file,
                overrides.as_deref(),
                args,
                dry_run,
            ),
            Commands::Languages => languages_command(),
            Commands::Check { file, workspace } => check_command(&global.host_options(workspace, None), &file),
            Commands::Watch { dir } => watch_command(&global.host_options(None, None), &dir),
            Commands::Reset { global: all, workspace } => {
                reset_command(&global.host_options(None, None), all, workspace.as_deref())
            }
        }
    }
}
