#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    medminder_lib::init_tracing();

    if let Err(e) = medminder_lib::run().await {
        tracing::error!(error = %e, "medminder stopped");
        std::process::exit(1);
    }
}
