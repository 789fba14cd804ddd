use reqwest::Response;
use torrenttp::servers::apis::v1::context::torrent::resources::{AddedTorrent, TorrentList};

// Resource responses

pub async fn assert_added_torrent(response: Response) -> AddedTorrent {
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    response.json::<AddedTorrent>().await.unwrap()
}

pub async fn assert_torrent_list(response: Response) -> TorrentList {
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    response.json::<TorrentList>().await.unwrap()
}

// Error responses

pub async fn assert_error(response: Response, status: u16, message: &str) {
    assert_eq!(response.status(), status);
    assert_eq!(response.headers().get("content-type").unwrap(), "application/json");
    assert_eq!(
        response.json::<serde_json::Value>().await.unwrap(),
        serde_json::json!({ "error": message })
    );
}

pub async fn assert_bad_request(response: Response, message: &str) {
    assert_error(response, 400, message).await;
}

pub async fn assert_invalid_info_hash_param(response: Response, invalid_info_hash: &str) {
    assert_bad_request(
        response,
        &format!("Invalid info-hash `{invalid_info_hash}`, expected a 40 character long hexadecimal string"),
    )
    .await;
}

pub async fn assert_key_not_valid(response: Response) {
    assert_error(response, 403, "Key is not valid").await;
}

pub async fn assert_torrent_not_found(response: Response) {
    assert_error(response, 404, "Torrent not found").await;
}

pub async fn assert_file_not_found(response: Response) {
    assert_error(response, 404, "File not found").await;
}

pub async fn assert_no_torrent_provided(response: Response) {
    assert_error(response, 404, "No torrent provided").await;
}

pub async fn assert_no_files_provided(response: Response) {
    assert_error(response, 404, "No files provided").await;
}

pub async fn assert_file_not_completed(response: Response) {
    assert_error(response, 202, "File is not completed").await;
}
