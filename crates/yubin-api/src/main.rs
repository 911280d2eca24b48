#[tokio::main]
async fn main() {
    if let Err(err) = yubin_api::run().await {
        tracing::error!(error = %err, "yubin-api failed");
        std::process::exit(1);
    }
}
