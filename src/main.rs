#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = tutor_dashboard::run().await {
        eprintln!("tutor-dashboard fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
