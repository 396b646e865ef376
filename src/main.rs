#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    canarygate::logging::init_logging();

    let app = canarygate::App::new().await?;
    app.run().await?;

    Ok(())
}
