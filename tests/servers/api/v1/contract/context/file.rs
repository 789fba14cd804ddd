use serde_json::json;
use torrenttp_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::fixtures::{movie_bytes, sample_magnet, SAMPLE_INFO_HASH, SAMPLE_MOVIE, SAMPLE_SUBTITLES, UNKNOWN_INFO_HASH};
use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::v1::asserts::{assert_file_not_completed, assert_file_not_found, assert_torrent_not_found};
use crate::servers::api::v1::client::Client;
use crate::servers::api::Started;

async fn started_with_sample_torrent() -> Started {
    let env = Started::new(&configuration::ephemeral().into());

    env.publish_sample_torrent();

    let response = Client::new(env.get_connection_info())
        .add_torrent(&json!({ "magnet": sample_magnet() }))
        .await;

    assert_eq!(response.status(), 200);

    env
}

mod for_streaming_files {
    use super::*;

    #[tokio::test]
    async fn should_stream_the_whole_file() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .stream(SAMPLE_INFO_HASH, SAMPLE_MOVIE, None)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("content-type").unwrap(), "video/mp4");
        assert_eq!(response.headers().get("accept-ranges").unwrap(), "bytes");
        assert_eq!(response.headers().get("content-length").unwrap(), "1000");
        assert_eq!(response.bytes().await.unwrap().to_vec(), movie_bytes());

        // The transport reads ahead 1% of the file
        let movie = env.sample_session().file(SAMPLE_MOVIE).unwrap();
        assert_eq!(movie.last_readahead(), 10);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_stream_a_range_of_the_file() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .stream(SAMPLE_INFO_HASH, SAMPLE_MOVIE, Some("bytes=300-309"))
            .await;

        assert_eq!(response.status(), 206);
        assert_eq!(response.headers().get("content-range").unwrap(), "bytes 300-309/1000");
        assert_eq!(response.bytes().await.unwrap().to_vec(), movie_bytes()[300..310].to_vec());

        let response = Client::new(env.get_connection_info())
            .stream(SAMPLE_INFO_HASH, SAMPLE_MOVIE, Some("bytes=-4"))
            .await;

        assert_eq!(response.status(), 206);
        assert_eq!(response.headers().get("content-range").unwrap(), "bytes 996-999/1000");
        assert_eq!(response.bytes().await.unwrap().to_vec(), movie_bytes()[996..].to_vec());

        env.stop().await;
    }

    #[tokio::test]
    async fn should_reject_a_range_outside_the_file() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .stream(SAMPLE_INFO_HASH, SAMPLE_MOVIE, Some("bytes=2000-"))
            .await;

        assert_eq!(response.status(), 416);
        assert_eq!(response.headers().get("content-range").unwrap(), "bytes */1000");

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_file_is_not_known() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .stream(SAMPLE_INFO_HASH, "missing.mkv", None)
            .await;

        assert_file_not_found(response).await;

        let response = Client::new(env.get_connection_info())
            .stream(UNKNOWN_INFO_HASH, SAMPLE_MOVIE, None)
            .await;

        assert_torrent_not_found(response).await;

        env.stop().await;
    }
}

mod for_downloading_files {
    use super::*;

    #[tokio::test]
    async fn should_not_download_a_file_that_is_not_completed() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        env.sample_session().download(SAMPLE_MOVIE, 999);

        let response = Client::new(env.get_connection_info())
            .download(SAMPLE_INFO_HASH, SAMPLE_MOVIE)
            .await;

        assert_file_not_completed(response).await;

        env.stop().await;
    }

    #[tokio::test]
    async fn should_download_a_completed_file_as_an_attachment() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        env.sample_session().download_all();

        let response = Client::new(env.get_connection_info())
            .download(SAMPLE_INFO_HASH, SAMPLE_MOVIE)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers().get("content-disposition").unwrap(),
            "attachment; filename=\"Season 1 - movie.mp4\""
        );
        assert_eq!(response.bytes().await.unwrap().to_vec(), movie_bytes());

        let response = Client::new(env.get_connection_info())
            .download(SAMPLE_INFO_HASH, SAMPLE_SUBTITLES)
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers().get("content-type").unwrap(), "application/x-subrip");

        env.stop().await;
    }
}
