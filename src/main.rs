#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = coursework_api::run().await {
        eprintln!("coursework-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
