#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    event_overview::run().await
}
