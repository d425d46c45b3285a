//! Posts service binary

use clap::{Parser, Subcommand};
use minipost::common::cli::ServeArgs;
use minipost::{Config, PostsServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minipost-posts")]
#[command(about = "minipost posts service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start posts server
    Serve {
        #[command(flatten)]
        args: ServeArgs,

        /// Comments service name or address
        #[arg(long, env = "COMMENTS")]
        comments: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { args, comments } => {
            // Load config from file and MINIPOST__* env, then override with CLI arguments
            let mut config = Config::load()?;
            args.apply(&mut config);
            if comments.is_some() {
                config.peers.comments = comments;
            }

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| config.log_level.clone().into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            PostsServer::new(config).serve().await?;
        }
    }

    Ok(())
}
