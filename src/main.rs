mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut clog = colog::default_builder();
    clog.filter(None, log::LevelFilter::Info);
    clog.init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { query } => commands::decode(&query),
        Commands::Encode {
            json,
            double_map_fragments,
        } => commands::encode(&json, double_map_fragments),
        Commands::Save { profile, query } => commands::save(&profile, &query),
        Commands::List {
            profile,
            category,
            base_url,
        } => commands::list(&profile, category.as_deref(), &base_url),
        Commands::Delete { profile, title } => commands::delete(&profile, &title),
    }
}
