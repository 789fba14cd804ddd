use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;

use crate::common::http::{Query, QueryParam, ReqwestQuery};
use crate::servers::api::connection_info::ConnectionInfo;

/// API Client
pub struct Client {
    connection_info: ConnectionInfo,
    base_path: String,
}

impl Client {
    pub fn new(connection_info: ConnectionInfo) -> Self {
        Self {
            connection_info,
            base_path: "/api/".to_string(),
        }
    }

    /// A client sending the key in the `/api/key/{key}/` path prefix instead
    /// of the query.
    pub fn with_key_in_path(connection_info: ConnectionInfo) -> Self {
        let key = connection_info.api_key.clone().unwrap_or_default();

        Self {
            connection_info: ConnectionInfo::anonymous(&connection_info.bind_address),
            base_path: format!("/api/key/{key}/"),
        }
    }

    pub async fn add_torrent<T: Serialize + ?Sized>(&self, form: &T) -> Response {
        self.post_form("addtorrent", form).await
    }

    pub async fn add_torrent_file(&self, content: Vec<u8>) -> Response {
        let form = Form::new().part("torrent", Part::bytes(content).file_name("sample.torrent"));

        self.send(reqwest::Client::new().post(self.base_url("addtorrentfile")).multipart(form))
            .await
    }

    pub async fn select_file<T: Serialize + ?Sized>(&self, form: &T) -> Response {
        self.post_form("selectfile", form).await
    }

    pub async fn set_priority<T: Serialize + ?Sized>(&self, form: &T) -> Response {
        self.post_form("setpriority", form).await
    }

    pub async fn remove_torrent<T: Serialize + ?Sized>(&self, form: &T) -> Response {
        self.send(reqwest::Client::new().delete(self.base_url("removetorrent")).json(form))
            .await
    }

    pub async fn get_torrents(&self) -> Response {
        self.get("torrents", Query::default()).await
    }

    pub async fn get_torrent(&self, info_hash: &str) -> Response {
        self.get(&format!("torrents/{info_hash}"), Query::default()).await
    }

    pub async fn stream(&self, info_hash: &str, file: &str, range: Option<&str>) -> Response {
        let mut request = reqwest::Client::new().get(self.base_url(&format!("stream/{info_hash}/{file}")));

        if let Some(range) = range {
            request = request.header("Range", range);
        }

        self.send(request).await
    }

    pub async fn download(&self, info_hash: &str, file: &str) -> Response {
        self.get(&format!("file/{info_hash}/{file}"), Query::default()).await
    }

    pub async fn play(&self, params: Query) -> Response {
        self.get("play", params).await
    }

    pub async fn health_check(&self) -> Response {
        reqwest::Client::new()
            .get(format!("http://{}/api/health_check", &self.connection_info.bind_address))
            .send()
            .await
            .expect("the request should be sent")
    }

    pub async fn get(&self, path: &str, params: Query) -> Response {
        let mut query: Query = params;

        if let Some(key) = &self.connection_info.api_key {
            query.add_param(QueryParam::new("key", key));
        };

        reqwest::Client::new()
            .get(self.base_url(path))
            .query(&ReqwestQuery::from(query))
            .send()
            .await
            .expect("the request should be sent")
    }

    pub async fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Response {
        self.send(reqwest::Client::new().post(self.base_url(path)).json(&form)).await
    }

    pub async fn post_raw(&self, path: &str, body: &str) -> Response {
        self.send(
            reqwest::Client::new()
                .post(self.base_url(path))
                .header("Content-Type", "application/json")
                .body(body.to_string()),
        )
        .await
    }

    async fn send(&self, request: RequestBuilder) -> Response {
        request
            .query(&ReqwestQuery::from(self.query_with_key()))
            .send()
            .await
            .expect("the request should be sent")
    }

    fn query_with_key(&self) -> Query {
        match &self.connection_info.api_key {
            Some(key) => Query::params([QueryParam::new("key", key)].to_vec()),
            None => Query::default(),
        }
    }

    fn base_url(&self, path: &str) -> String {
        format!("http://{}{}{path}", &self.connection_info.bind_address, &self.base_path)
    }
}
