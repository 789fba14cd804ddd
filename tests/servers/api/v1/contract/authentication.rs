use torrenttp_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::http::{Query, QueryParam};
use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::connection_info::{connection_with_invalid_key, connection_with_no_key, ConnectionInfo};
use crate::servers::api::v1::asserts::assert_key_not_valid;
use crate::servers::api::v1::client::Client;
use crate::servers::api::Started;

#[tokio::test]
async fn should_authenticate_requests_by_using_a_key_query_param() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_auth("MyKey").into());

    let response = Client::new(env.get_connection_info()).get_torrents().await;

    assert_eq!(response.status(), 200);

    env.stop().await;
}

#[tokio::test]
async fn should_authenticate_requests_with_a_url_encoded_key() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_auth("My Key/1").into());

    // The client percent-encodes the query value
    let response = Client::new(ConnectionInfo::anonymous(&env.bind_address().to_string()))
        .get("torrents", Query::params([QueryParam::new("key", "My Key/1")].to_vec()))
        .await;

    assert_eq!(response.status(), 200);

    env.stop().await;
}

#[tokio::test]
async fn should_authenticate_requests_by_using_the_key_path_prefix() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_auth("MyKey").into());

    let response = Client::with_key_in_path(env.get_connection_info()).get_torrents().await;

    assert_eq!(response.status(), 200);

    env.stop().await;
}

#[tokio::test]
async fn should_not_authenticate_requests_when_the_key_is_missing() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_auth("MyKey").into());

    let response = Client::new(connection_with_no_key(&env.bind_address().to_string()))
        .get_torrents()
        .await;

    assert_key_not_valid(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_not_authenticate_requests_when_the_key_is_invalid() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral_with_auth("MyKey").into());

    let response = Client::new(connection_with_invalid_key(&env.bind_address().to_string()))
        .get_torrents()
        .await;

    assert_key_not_valid(response).await;

    let response = Client::with_key_in_path(connection_with_invalid_key(&env.bind_address().to_string()))
        .get_torrents()
        .await;

    assert_key_not_valid(response).await;

    env.stop().await;
}

#[tokio::test]
async fn should_not_require_a_key_when_the_authentication_is_disabled() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = Client::new(connection_with_no_key(&env.bind_address().to_string()))
        .get_torrents()
        .await;

    assert_eq!(response.status(), 200);

    env.stop().await;
}
