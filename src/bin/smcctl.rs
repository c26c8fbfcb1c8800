//! # SMCCTL CLI
//!
//! Command-line access to GCP Secret Manager through the same client the C
//! ABI uses. Handy for checking credentials and names from a shell before
//! wiring up a host program.
//!
//! ## Usage
//!
//! ```bash
//! # Print the canonical resource name
//! smcctl name my-project db-password --version 3
//!
//! # Write the raw payload of the latest version to stdout
//! smcctl access my-project db-password > password.bin
//!
//! # Print version metadata as JSON
//! smcctl metadata --name projects/my-project/secrets/db-password/versions/1
//! ```
//!
//! Connection settings come from the same environment variables as the
//! library (`SMC_ENDPOINT`, `SMC_ACCESS_TOKEN`, `GCE_METADATA_HOST`,
//! `SMC_REQUEST_TIMEOUT_SECS`); logging is controlled by `SMC_LOG`.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;

use secret_manager_ffi::config::ClientConfig;
use secret_manager_ffi::observability::logging;
use secret_manager_ffi::{ResourceName, SecretClient};

/// GCP Secret Manager client
#[derive(Parser)]
#[command(name = "smcctl")]
#[command(about = "Read secrets and version metadata from GCP Secret Manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource name for a project, secret and version
    Name {
        #[arg(value_name = "PROJECT_ID")]
        project_id: String,

        #[arg(value_name = "SECRET_ID")]
        secret_id: String,

        /// Version number or alias (defaults to latest)
        #[arg(short, long)]
        version: Option<String>,
    },
    /// Write the raw payload of a secret version to stdout
    Access(Target),
    /// Print the metadata of a secret version as JSON
    Metadata(Target),
}

/// A secret version given either by parts or by full resource name
#[derive(Args)]
struct Target {
    #[arg(value_name = "PROJECT_ID", required_unless_present = "name")]
    project_id: Option<String>,

    #[arg(value_name = "SECRET_ID", required_unless_present = "name")]
    secret_id: Option<String>,

    /// Version number or alias (defaults to latest)
    #[arg(short, long, conflicts_with = "name")]
    version: Option<String>,

    /// Fully-qualified `projects/*/secrets/*/versions/*` name
    #[arg(long, conflicts_with_all = ["project_id", "secret_id"])]
    name: Option<String>,
}

impl Target {
    fn resolve(&self) -> Result<ResourceName> {
        match (&self.project_id, &self.secret_id) {
            (Some(project_id), Some(secret_id)) => {
                ResourceName::new(project_id, secret_id, self.version.as_deref())
                    .context("Invalid secret reference")
            }
            _ => bail!("PROJECT_ID and SECRET_ID are required without --name"),
        }
    }
}

fn connect() -> Result<SecretClient> {
    let config = ClientConfig::from_env();
    SecretClient::connect(&config)
        .with_context(|| format!("Failed to create client for {}", config.endpoint))
}

fn main() -> Result<()> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Name {
            project_id,
            secret_id,
            version,
        } => {
            let name = ResourceName::new(&project_id, &secret_id, version.as_deref())
                .context("Invalid secret reference")?;
            println!("{name}");
        }
        Commands::Access(target) => {
            let client = connect()?;
            let payload = match &target.name {
                Some(name) => client.access_secret_by_name(name),
                None => client.access_secret(&target.resolve()?),
            }
            .context("Failed to access secret")?;

            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&payload)
                .and_then(|()| stdout.flush())
                .context("Failed to write payload to stdout")?;
        }
        Commands::Metadata(target) => {
            let client = connect()?;
            let metadata = match &target.name {
                Some(name) => client.secret_metadata_by_name(name),
                None => client.secret_metadata(&target.resolve()?),
            }
            .context("Failed to fetch secret metadata")?;
            println!("{}", metadata.to_json()?);
        }
    }

    Ok(())
}
