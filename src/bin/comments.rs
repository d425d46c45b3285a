//! Comments service binary

use clap::{Parser, Subcommand};
use minipost::common::cli::ServeArgs;
use minipost::{CommentsServer, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minipost-comments")]
#[command(about = "minipost comments service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start comments server
    Serve {
        #[command(flatten)]
        args: ServeArgs,

        /// Posts service name or address
        #[arg(long, env = "POSTS")]
        posts: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { args, posts } => {
            let mut config = Config::load()?;
            args.apply(&mut config);
            if posts.is_some() {
                config.peers.posts = posts;
            }

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| config.log_level.clone().into()),
                )
                .with(tracing_subscriber::fmt::layer())
                .init();

            CommentsServer::new(config).serve().await?;
        }
    }

    Ok(())
}
