pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::database::DbTarget;

#[derive(Parser)]
#[command(name = "panelctl")]
#[command(about = "panelctl - operator tooling for the cinema admin panel")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show which database serves a namespace")]
    Route {
        #[arg(help = "Model namespace, e.g. movie or auth")]
        namespace: String,
    },

    #[command(about = "Decide whether two namespaces may reference each other")]
    Relation {
        #[arg(help = "First namespace")]
        a: String,
        #[arg(help = "Second namespace")]
        b: String,
    },

    #[command(about = "List registered admin models and their databases")]
    Models,

    #[command(about = "Run a login through the identity provider")]
    Login {
        #[arg(help = "Username (email) at the identity provider")]
        username: String,
        #[arg(long, help = "Password; read from stdin when omitted")]
        password: Option<String>,
    },

    #[command(about = "Check every configured database")]
    Health,

    #[command(about = "Create the admin user table on a database")]
    Bootstrap {
        #[arg(long, help = "Target database (default, auth, movie, notification, profile)")]
        database: DbTarget,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Route { namespace } => commands::routing::route(&namespace, output_format),
        Commands::Relation { a, b } => commands::routing::relation(&a, &b, output_format),
        Commands::Models => commands::routing::models(output_format),
        Commands::Login { username, password } => {
            commands::login::handle(&username, password, output_format).await
        }
        Commands::Health => commands::database::health(output_format).await,
        Commands::Bootstrap { database } => {
            commands::database::bootstrap(database, output_format).await
        }
    }
}
