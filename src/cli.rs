use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for favkit
#[derive(Parser, Debug)]
#[command(name = "favkit")]
#[command(about = "Inspect and manage media-center addon favorites from the command line")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a favorites query string and print it as JSON
    Decode {
        /// Encoded query string, e.g. "mode=__str__/main"
        query: String,
    },

    /// Encode a JSON object into a favorites query string
    Encode {
        /// JSON object with string, array-of-string or object-of-string values
        json: String,

        /// Emit every map-valued fragment twice, as older encoders did
        #[arg(long)]
        double_map_fragments: bool,
    },

    /// Save a favorite from an invocation query string
    Save {
        /// Addon profile directory holding the Favorites store
        #[arg(short, long)]
        profile: PathBuf,

        /// Invocation query string, e.g. "title=Test+Movie&callback=play&category=movies"
        query: String,
    },

    /// List favorites, or the category menu when no category is given
    List {
        /// Addon profile directory holding the Favorites store
        #[arg(short, long)]
        profile: PathBuf,

        /// Category to list, used as a case-insensitive prefix pattern
        #[arg(short, long)]
        category: Option<String>,

        /// Base URL rendered into context-menu commands
        #[arg(long, default_value = "plugin://favorites")]
        base_url: String,
    },

    /// Delete the favorite saved under a title
    Delete {
        /// Addon profile directory holding the Favorites store
        #[arg(short, long)]
        profile: PathBuf,

        /// Title the favorite was saved under
        #[arg(short, long)]
        title: String,
    },
}
