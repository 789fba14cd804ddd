use std::sync::Arc;

use serde_json::json;
use sha1::{Digest, Sha1};
use torrenttp::core::transport::PeerConnection;
use torrenttp::servers::apis::v1::context::torrent::resources::{
    AddedFile, Peer, PrioritizedFiles, RemovedTorrent, SelectedFiles, Torrent,
};
use torrenttp_primitives::info_hash::InfoHash;
use torrenttp_test_helpers::configuration;
use tracing::level_filters::LevelFilter;

use crate::common::fixtures::{
    info_hash, invalid_info_hashes, sample_magnet, SAMPLE_INFO_HASH, SAMPLE_MOVIE, SAMPLE_NAME, SAMPLE_SUBTITLES,
    UNKNOWN_INFO_HASH,
};
use crate::common::logging::{tracing_stderr_init, INIT};
use crate::servers::api::v1::asserts::{
    assert_added_torrent, assert_bad_request, assert_error, assert_invalid_info_hash_param, assert_no_files_provided,
    assert_no_torrent_provided, assert_torrent_list, assert_torrent_not_found,
};
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

mod for_adding_torrents {
    use super::*;

    #[tokio::test]
    async fn should_allow_adding_a_torrent_from_a_magnet_link() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());
        env.publish_sample_torrent();

        let response = Client::new(env.get_connection_info())
            .add_torrent(&json!({ "magnet": sample_magnet() }))
            .await;

        let added = assert_added_torrent(response).await;

        assert_eq!(added.name, SAMPLE_NAME);
        assert_eq!(added.info_hash, SAMPLE_INFO_HASH);
        assert_eq!(
            added.files,
            vec![
                AddedFile {
                    file_name: SAMPLE_MOVIE.to_string(),
                    file_size_bytes: 1000,
                    file_size_readable: "1.0 kB".to_string(),
                },
                AddedFile {
                    file_name: SAMPLE_SUBTITLES.to_string(),
                    file_size_bytes: 38,
                    file_size_readable: "38 B".to_string(),
                },
            ]
        );

        env.stop().await;
    }

    #[tokio::test]
    async fn should_allow_adding_a_torrent_from_its_info_hash_and_trackers() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());
        env.publish_sample_torrent();

        let response = Client::new(env.get_connection_info())
            .add_torrent(&json!({
                "info_hash": SAMPLE_INFO_HASH,
                "display_name": "My sample",
                "trackers": ["udp://tracker.example.com:6969"]
            }))
            .await;

        let added = assert_added_torrent(response).await;

        assert_eq!(added.info_hash, SAMPLE_INFO_HASH);

        let stored = env
            .engine
            .database
            .get_torrent_spec(&info_hash(SAMPLE_INFO_HASH))
            .unwrap()
            .expect("the descriptor should be stored");

        assert_eq!(stored.display_name, "My sample");
        assert_eq!(stored.trackers, vec![vec!["udp://tracker.example.com:6969".to_string()]]);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_allow_adding_a_torrent_from_a_torrent_file() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let info = b"d6:lengthi10e4:name8:file.txt12:piece lengthi16384e6:pieces20:aaaaaaaaaaaaaaaaaaaae";
        let info_hash = InfoHash::try_from(Sha1::digest(info).to_vec()).unwrap();

        env.transport
            .publish(info_hash, "file.txt", vec![("file.txt".to_string(), vec![7u8; 10])]);

        let mut torrent = b"d8:announce30:udp://tracker.example.com:69694:info".to_vec();
        torrent.extend_from_slice(info);
        torrent.push(b'e');

        let response = Client::new(env.get_connection_info()).add_torrent_file(torrent).await;

        let added = assert_added_torrent(response).await;

        assert_eq!(added.info_hash, info_hash.to_string());
        assert_eq!(added.name, "file.txt");

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_uploaded_file_is_not_a_torrent() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info())
            .add_torrent_file(b"not a torrent".to_vec())
            .await;

        assert_eq!(response.status(), 400);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_no_torrent_is_provided() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info()).add_torrent(&json!({})).await;

        assert_no_torrent_provided(response).await;

        // A display name is required along the info-hash
        let response = Client::new(env.get_connection_info())
            .add_torrent(&json!({ "info_hash": SAMPLE_INFO_HASH }))
            .await;

        assert_no_torrent_provided(response).await;

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_magnet_link_is_invalid() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info())
            .add_torrent(&json!({ "magnet": "magnet:?dn=nothing" }))
            .await;

        assert_bad_request(response, "Invalid magnet link: missing `xt=urn:btih:` parameter").await;

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_info_hash_is_invalid() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        for invalid_info_hash in &invalid_info_hashes() {
            let response = Client::new(env.get_connection_info())
                .add_torrent(&json!({ "info_hash": invalid_info_hash, "display_name": "x" }))
                .await;

            assert_invalid_info_hash_param(response, invalid_info_hash).await;
        }

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_body_is_not_valid_json() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info()).post_raw("addtorrent", "{magnet").await;

        assert_eq!(response.status(), 400);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_metadata_does_not_arrive_in_time() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let mut cfg = configuration::ephemeral();
        cfg.engine.metadata_timeout = 1;

        let env = Started::new(&Arc::new(cfg));

        let response = Client::new(env.get_connection_info())
            .add_torrent(&json!({ "magnet": format!("magnet:?xt=urn:btih:{UNKNOWN_INFO_HASH}") }))
            .await;

        assert_eq!(response.status(), 504);

        // Nothing is registered nor stored
        assert!(env.engine.get_torrent(&info_hash(UNKNOWN_INFO_HASH)).is_err());
        assert!(env
            .engine
            .database
            .get_torrent_spec(&info_hash(UNKNOWN_INFO_HASH))
            .unwrap()
            .is_none());

        env.stop().await;
    }
}

mod for_selecting_files {
    use super::*;

    #[tokio::test]
    async fn should_allow_selecting_some_files() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .select_file(&json!({ "info_hash": SAMPLE_INFO_HASH, "files": [SAMPLE_MOVIE, "stale.mkv"] }))
            .await;

        assert_eq!(response.status(), 200);

        let selected = response.json::<SelectedFiles>().await.unwrap();

        assert_eq!(selected.files.len(), 1);
        assert_eq!(selected.files[0].file_name, SAMPLE_MOVIE);
        assert_eq!(
            selected.files[0].stream,
            format!("/api/stream/{SAMPLE_INFO_HASH}/Season%201/movie.mp4")
        );
        assert_eq!(
            selected.files[0].download,
            format!("/api/file/{SAMPLE_INFO_HASH}/Season%201/movie.mp4")
        );

        let stored = env
            .engine
            .database
            .get_torrent_spec(&info_hash(SAMPLE_INFO_HASH))
            .unwrap()
            .expect("the descriptor should be stored");

        assert_eq!(stored.selected_files.len(), 1);
        assert_eq!(stored.selected_files[0].path, SAMPLE_MOVIE);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_allow_selecting_all_files() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .select_file(&json!({ "info_hash": SAMPLE_INFO_HASH, "all_files": true }))
            .await;

        let selected = response.json::<SelectedFiles>().await.unwrap();

        assert_eq!(selected.files.len(), 2);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_no_files_are_provided() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .select_file(&json!({ "info_hash": SAMPLE_INFO_HASH, "files": [] }))
            .await;

        assert_no_files_provided(response).await;

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_torrent_is_not_known() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info())
            .select_file(&json!({ "info_hash": UNKNOWN_INFO_HASH, "all_files": true }))
            .await;

        assert_torrent_not_found(response).await;

        env.stop().await;
    }
}

mod for_setting_priorities {
    use super::*;

    #[tokio::test]
    async fn should_allow_setting_the_priority_of_some_files() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .set_priority(&json!({ "info_hash": SAMPLE_INFO_HASH, "files": [SAMPLE_SUBTITLES], "priority": "high" }))
            .await;

        assert_eq!(response.status(), 200);

        let prioritized = response.json::<PrioritizedFiles>().await.unwrap();

        assert_eq!(prioritized.priority, "high");
        assert_eq!(prioritized.files.len(), 1);
        assert_eq!(prioritized.files[0].file_name, SAMPLE_SUBTITLES);

        env.stop().await;
    }

    #[tokio::test]
    async fn an_unknown_priority_should_mean_none() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .set_priority(&json!({ "info_hash": SAMPLE_INFO_HASH, "all_files": true, "priority": "urgent" }))
            .await;

        let prioritized = response.json::<PrioritizedFiles>().await.unwrap();

        assert_eq!(prioritized.priority, "none");

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_no_files_are_provided() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .set_priority(&json!({ "info_hash": SAMPLE_INFO_HASH, "priority": "high" }))
            .await;

        assert_no_files_provided(response).await;

        env.stop().await;
    }
}

mod for_removing_torrents {
    use super::*;

    #[tokio::test]
    async fn should_allow_removing_a_torrent() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        let response = Client::new(env.get_connection_info())
            .remove_torrent(&json!({ "info_hash": SAMPLE_INFO_HASH, "remove_files": true }))
            .await;

        assert_eq!(response.status(), 200);
        assert_eq!(
            response.json::<RemovedTorrent>().await.unwrap(),
            RemovedTorrent {
                name: SAMPLE_NAME.to_string(),
                info_hash: SAMPLE_INFO_HASH.to_string(),
            }
        );

        let response = Client::new(env.get_connection_info()).get_torrent(SAMPLE_INFO_HASH).await;

        assert_torrent_not_found(response).await;

        assert!(env
            .engine
            .database
            .get_torrent_spec(&info_hash(SAMPLE_INFO_HASH))
            .unwrap()
            .is_none());

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_when_the_torrent_is_not_known() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info())
            .remove_torrent(&json!({ "info_hash": UNKNOWN_INFO_HASH }))
            .await;

        assert_torrent_not_found(response).await;

        env.stop().await;
    }
}

mod for_listing_torrents {
    use super::*;

    #[tokio::test]
    async fn should_allow_getting_all_torrents() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info()).get_torrents().await;

        assert!(assert_torrent_list(response).await.torrents.is_empty());

        env.publish_sample_torrent();
        Client::new(env.get_connection_info())
            .add_torrent(&json!({ "magnet": sample_magnet() }))
            .await;

        let response = Client::new(env.get_connection_info()).get_torrents().await;

        let list = assert_torrent_list(response).await;

        assert_eq!(list.torrents.len(), 1);
        assert_eq!(list.torrents[0].info_hash, SAMPLE_INFO_HASH);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_allow_getting_a_torrent_with_its_files_and_progress() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        Client::new(env.get_connection_info())
            .select_file(&json!({ "info_hash": SAMPLE_INFO_HASH, "files": [SAMPLE_MOVIE] }))
            .await;

        env.sample_session().download(SAMPLE_MOVIE, 500);

        let response = Client::new(env.get_connection_info()).get_torrent(SAMPLE_INFO_HASH).await;

        let list = assert_torrent_list(response).await;

        assert_eq!(list.torrents.len(), 1);

        let torrent: &Torrent = &list.torrents[0];

        assert_eq!(torrent.name, SAMPLE_NAME);
        assert_eq!(torrent.progress, "500 B/1.0 kB");

        let movie = &torrent.files[0];
        assert_eq!(movie.file_name, SAMPLE_MOVIE);
        assert_eq!(movie.downloaded_bytes, 500);
        assert_eq!(movie.priority, "normal");
        assert_eq!(
            movie.stream,
            Some(format!("/api/stream/{SAMPLE_INFO_HASH}/Season%201/movie.mp4"))
        );

        // No link until a byte is downloaded
        let subtitles = &torrent.files[1];
        assert_eq!(subtitles.priority, "none");
        assert_eq!(subtitles.stream, None);
        assert_eq!(subtitles.download, None);

        env.stop().await;
    }

    #[tokio::test]
    async fn should_list_the_connected_peers_of_a_torrent() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = started_with_sample_torrent().await;

        env.sample_session().set_peers(vec![
            PeerConnection {
                addr: "10.0.0.1:6881".parse().expect("it should be a valid socket address"),
                client: Some("qBittorrent 4.6".to_string()),
            },
            PeerConnection {
                addr: "10.0.0.2:6881".parse().expect("it should be a valid socket address"),
                client: None,
            },
        ]);

        let response = Client::new(env.get_connection_info()).get_torrents().await;

        let list = assert_torrent_list(response).await;
        let torrent = &list.torrents[0];

        assert_eq!(torrent.total_peers, 2);
        assert_eq!(torrent.active_peers, 2);
        assert_eq!(
            torrent.peers,
            vec![
                Peer {
                    addr: "10.0.0.1:6881".to_string(),
                    client: "qBittorrent 4.6".to_string()
                },
                Peer {
                    addr: "10.0.0.2:6881".to_string(),
                    client: "NOTPROVIDED".to_string()
                },
            ]
        );

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_getting_a_torrent_that_is_not_known() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        let response = Client::new(env.get_connection_info()).get_torrent(UNKNOWN_INFO_HASH).await;

        assert_torrent_not_found(response).await;

        env.stop().await;
    }

    #[tokio::test]
    async fn should_fail_getting_a_torrent_when_the_info_hash_is_invalid() {
        INIT.call_once(|| {
            tracing_stderr_init(LevelFilter::ERROR);
        });

        let env = Started::new(&configuration::ephemeral().into());

        for invalid_info_hash in &invalid_info_hashes() {
            let response = Client::new(env.get_connection_info()).get_torrent(invalid_info_hash).await;

            assert_error(
                response,
                400,
                &format!("Invalid info-hash `{invalid_info_hash}`, expected a 40 character long hexadecimal string"),
            )
            .await;
        }

        env.stop().await;
    }
}
