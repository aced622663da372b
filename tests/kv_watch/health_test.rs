use tonic::transport::Channel;
use tonic_health::pb::health_check_response::ServingStatus;
use tonic_health::pb::health_client::HealthClient;
use tonic_health::pb::HealthCheckRequest;

use crate::common::TestServer;
use crate::common::WATCH_WINDOW_IN_MS;

async fn health_client(server: &TestServer) -> HealthClient<Channel> {
    let channel = Channel::from_shared(server.endpoint())
        .unwrap()
        .connect()
        .await
        .unwrap();
    HealthClient::new(channel)
}

#[tokio::test]
async fn test_health_reports_kv_storage_serving() {
    let server = TestServer::start(WATCH_WINDOW_IN_MS).await;
    let mut client = health_client(&server).await;

    let response = client
        .check(HealthCheckRequest {
            service: "kvwatch.KvStorage".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.into_inner().status, ServingStatus::Serving as i32);
    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_health_rejects_unknown_service() {
    let server = TestServer::start(WATCH_WINDOW_IN_MS).await;
    let mut client = health_client(&server).await;

    let status = client
        .check(HealthCheckRequest {
            service: "kvwatch.Unknown".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(status.code(), tonic::Code::NotFound);
    drop(client);
    server.stop().await.unwrap();
}
