use clap::{Parser, Subcommand};

use crate::{get_matrix::GetMatrixArgs, optimize::OptimizeArgs, tour::TourArgs};

mod get_matrix;
mod optimize;
mod parsers;
mod tour;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank every optional-stop combination between an origin and a
    /// destination
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Shortest round trip through all given locations
    Tour {
        #[command(flatten)]
        args: TourArgs,
    },
    /// Fetch and print the raw travel matrix for a set of locations
    Matrix {
        #[command(flatten)]
        args: GetMatrixArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Some(Commands::Optimize { args }) => optimize::run(args).await?,
        Some(Commands::Tour { args }) => tour::run(args).await?,
        Some(Commands::Matrix { args }) => get_matrix::run(args).await?,
        None => {
            // Handle no command provided
        }
    }

    Ok(())
}
