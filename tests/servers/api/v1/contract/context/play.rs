use torrenttp_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::fixtures::{info_hash, sample_magnet, SAMPLE_INFO_HASH, SAMPLE_MOVIE, SAMPLE_SUBTITLES};
use crate::common::http::{Query, QueryParam};
use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::v1::asserts::assert_bad_request;
use crate::servers::api::v1::client::Client;
use crate::servers::api::Started;

#[tokio::test]
async fn should_return_a_playlist_with_every_file_when_none_is_given() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    env.publish_sample_torrent();

    let response = Client::new(env.get_connection_info())
        .play(Query::params([QueryParam::new("magnet", &sample_magnet())].to_vec()))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("content-disposition").unwrap(),
        &format!("attachment; filename=\"{SAMPLE_INFO_HASH}.m3u\"")
    );

    let host = env.bind_address();
    let playlist = response.text().await.unwrap();

    assert_eq!(
        playlist,
        format!(
            "#EXTM3U\n\
             #EXTINF:-1,{SAMPLE_MOVIE}\n\
             http://{host}/api/stream/{SAMPLE_INFO_HASH}/Season%201/movie.mp4\n\
             #EXTINF:-1,{SAMPLE_SUBTITLES}\n\
             http://{host}/api/stream/{SAMPLE_INFO_HASH}/subs.srt\n"
        )
    );

    // Every file was selected
    let stored = env
        .engine
        .database
        .get_torrent_spec(&info_hash(SAMPLE_INFO_HASH))
        .unwrap()
        .expect("the descriptor should be stored");

    assert!(stored.selected_all);

    env.stop().await;
}

#[tokio::test]
async fn should_return_a_playlist_with_the_given_files_and_overrides() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    env.publish_sample_torrent();

    let response = Client::new(env.get_connection_info())
        .play(Query::params(
            [
                QueryParam::new("magnet", &sample_magnet()),
                QueryParam::new("dn", "Renamed"),
                QueryParam::new("tr", "udp://a.example.com:80"),
                QueryParam::new("tr", "udp://b.example.com:80"),
                QueryParam::new("file", SAMPLE_SUBTITLES),
            ]
            .to_vec(),
        ))
        .await;

    assert_eq!(response.status(), 200);

    let playlist = response.text().await.unwrap();

    assert!(playlist.starts_with("#EXTM3U\n"));
    assert!(playlist.contains("subs.srt"));
    assert!(!playlist.contains("movie.mp4"));

    let stored = env
        .engine
        .database
        .get_torrent_spec(&info_hash(SAMPLE_INFO_HASH))
        .unwrap()
        .expect("the descriptor should be stored");

    assert_eq!(stored.display_name, "Renamed");
    assert_eq!(
        stored.trackers,
        vec![
            vec!["udp://a.example.com:80".to_string()],
            vec!["udp://b.example.com:80".to_string()]
        ]
    );

    env.stop().await;
}

#[tokio::test]
async fn should_use_the_forwarded_scheme_in_the_links() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());
    env.publish_sample_torrent();

    let response = reqwest::Client::new()
        .get(format!("http://{}/api/play", env.bind_address()))
        .query(&[("magnet", sample_magnet()), ("file", SAMPLE_MOVIE.to_string())])
        .header("X-Forwarded-Proto", "https")
        .header("Host", "tv.example.com")
        .send()
        .await
        .unwrap();

    let playlist = response.text().await.unwrap();

    assert!(playlist.contains(&format!(
        "https://tv.example.com/api/stream/{SAMPLE_INFO_HASH}/Season%201/movie.mp4"
    )));

    env.stop().await;
}

#[tokio::test]
async fn should_fail_when_the_magnet_link_is_missing() {
    INIT.call_once(|| {
        tracing_stderr_init(LevelFilter::ERROR);
    });

    let env = Started::new(&configuration::ephemeral().into());

    let response = Client::new(env.get_connection_info()).play(Query::empty()).await;

    assert_bad_request(response, "Invalid magnet link").await;

    env.stop().await;
}
