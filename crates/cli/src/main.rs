use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "shelf", about = "Book catalog service control", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply migrations and serve the HTTP API until interrupted
    Serve,
    /// Apply pending module migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => shelf_app::app::run().await,
        Command::Migrate => shelf_app::app::migrate().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
