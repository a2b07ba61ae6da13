#[tokio::main]
async fn main() {
    if let Err(e) = docuvault::run().await {
        eprintln!("docuvault: {e}");
        std::process::exit(1);
    }
}
