use crate::server::start_api_server;

pub async fn serve() {
    start_api_server().await;
}
