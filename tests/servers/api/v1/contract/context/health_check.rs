use torrenttp::servers::apis::v1::context::health_check::resources::{Report, Status};
use torrenttp_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::connection_info::connection_with_no_key;
use crate::servers::api::v1::client::Client;
use crate::servers::api::Started;

#[tokio::test]
async fn health_check_endpoint_should_return_status_ok_without_a_key() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_auth("MyKey").into());

    let response = Client::new(connection_with_no_key(&env.bind_address().to_string()))
        .health_check()
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    assert_eq!(response.json::<Report>().await.unwrap(), Report { status: Status::Ok });

    env.stop().await;
}

#[tokio::test]
async fn every_response_should_carry_a_request_id() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = Client::new(env.get_connection_info()).health_check().await;

    assert!(response.headers().get("x-request-id").is_some());

    env.stop().await;
}
