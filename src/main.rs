//! Provider plugin entry point.

use hemmer_provider_radarr::{init_logging, plugin, RadarrProvider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    plugin::serve(RadarrProvider::new()).await
}
