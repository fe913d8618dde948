#[tokio::main]
async fn main() {
    clean_connect::start_server().await;
}
