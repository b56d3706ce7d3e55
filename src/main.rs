use clap::Parser;
use daily_journal::cli::{handle_openapi, handle_serve, Cli, Commands};

fn main() {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            database,
        } => handle_serve(host, port, database),
        Commands::Openapi { yaml, port } => handle_openapi(yaml, port),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
