#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelf_app::app::run().await
}
