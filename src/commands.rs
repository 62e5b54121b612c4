use std::path::Path;

use favkit::{
    delete_favorite, encode_with, list_favorites, parse_query, save_favorite, EncodeOptions,
    FsStore, MenuBuilder, Notifier, QueryMap, QueryValue,
};

/// Prints transient notices to stderr, standing in for the host popup
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Decode an encoded query string and print it as pretty JSON
pub fn decode(query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let decoded = favkit::decode(query);
    let json = serde_json::to_string_pretty(&decoded)?;
    println!("{}", json);
    Ok(())
}

/// Encode a JSON object into the query-string format
pub fn encode(json: &str, double_map_fragments: bool) -> Result<(), Box<dyn std::error::Error>> {
    let queries: QueryMap = serde_json::from_str(json).map_err(|e| {
        anyhow::anyhow!(
            "Failed to parse input as a query object: {}. Values must be strings, \
             arrays of strings or objects of strings.",
            e
        )
    })?;
    let options = EncodeOptions {
        double_map_fragments,
    };
    println!("{}", encode_with(&queries, &options));
    Ok(())
}

/// Save the favorite described by an invocation query string
pub fn save(profile: &Path, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::new(profile);
    let ctx = parse_query(query);
    save_favorite(&store, &ctx)
        .map_err(|e| anyhow::anyhow!("Unable to save favorite: {}", e))?;
    println!("Favorite saved");
    Ok(())
}

/// List favorites for a category, or the category menu without one
pub fn list(
    profile: &Path,
    category: Option<&str>,
    base_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::new(profile);
    let menu = MenuBuilder::new(base_url);

    let mut ctx = QueryMap::new();
    if let Some(category) = category {
        ctx.insert("category".to_string(), QueryValue::from(category));
    }

    let listing = list_favorites(&store, &ConsoleNotifier, &menu, &ctx, None)
        .map_err(|e| anyhow::anyhow!("Failed to list favorites: {}", e))?;
    let json = serde_json::to_string_pretty(&listing)?;
    println!("{}", json);
    Ok(())
}

/// Delete the favorite saved under a title
pub fn delete(profile: &Path, title: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = FsStore::new(profile);

    let mut ctx = QueryMap::new();
    ctx.insert("title".to_string(), QueryValue::from(title));

    delete_favorite(&store, &ConsoleNotifier, &ctx)
        .map_err(|e| anyhow::anyhow!("Failed to delete favorite {:?}: {}", title, e))?;
    println!("Favorite deleted");
    Ok(())
}
