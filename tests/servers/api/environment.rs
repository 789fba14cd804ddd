use std::net::SocketAddr;
use std::sync::Arc;

use torrenttp::bootstrap::app::initialize_logging;
use torrenttp::core::auth::Gate;
use torrenttp::core::services::engine_factory;
use torrenttp::core::transport::memory::{MemorySession, MemoryTransport};
use torrenttp::core::Engine;
use torrenttp::servers::apis::server::{ApiServer, Launcher, Running, Stopped};
use torrenttp_configuration::{Configuration, HttpApi};

use super::connection_info::ConnectionInfo;
use crate::common::fixtures::{
    info_hash, movie_bytes, subtitles_bytes, SAMPLE_INFO_HASH, SAMPLE_MOVIE, SAMPLE_NAME, SAMPLE_SUBTITLES,
};

pub struct Environment<S> {
    pub config: Arc<HttpApi>,
    pub engine: Arc<Engine>,
    pub transport: Arc<MemoryTransport>,
    pub gate: Arc<Gate>,
    pub server: ApiServer<S>,
}

impl<S> Environment<S> {
    /// It makes the sample torrent known to the transport.
    pub fn publish_sample_torrent(&self) {
        self.transport.publish(
            info_hash(SAMPLE_INFO_HASH),
            SAMPLE_NAME,
            vec![
                (SAMPLE_MOVIE.to_string(), movie_bytes()),
                (SAMPLE_SUBTITLES.to_string(), subtitles_bytes()),
            ],
        );
    }

    /// The transport session of the sample torrent, once it was added.
    pub fn sample_session(&self) -> Arc<MemorySession> {
        self.transport
            .session(&info_hash(SAMPLE_INFO_HASH))
            .expect("the sample torrent should have been added")
    }
}

impl Environment<Stopped> {
    pub fn new(configuration: &Arc<Configuration>) -> Self {
        initialize_logging(configuration);

        let transport = Arc::new(MemoryTransport::new());

        let engine = Arc::new(engine_factory(configuration, transport.clone()));

        let gate = Arc::new(Gate::from_config(&configuration.http_api.auth));

        let config = Arc::new(configuration.http_api.clone());

        let server = ApiServer::new(Launcher::new(config.bind_address));

        Self {
            config,
            engine,
            transport,
            gate,
            server,
        }
    }

    pub fn start(self) -> Environment<Running> {
        Environment {
            config: self.config,
            engine: self.engine.clone(),
            transport: self.transport,
            gate: self.gate.clone(),
            server: self
                .server
                .start(self.engine, self.gate)
                .expect("it should start the API server"),
        }
    }
}

impl Environment<Running> {
    pub fn new(configuration: &Arc<Configuration>) -> Self {
        Environment::<Stopped>::new(configuration).start()
    }

    pub async fn stop(self) -> Environment<Stopped> {
        Environment {
            config: self.config,
            engine: self.engine,
            transport: self.transport,
            gate: self.gate,
            server: self.server.stop().await.expect("it should stop the API server"),
        }
    }

    pub fn get_connection_info(&self) -> ConnectionInfo {
        let key = &self.config.auth.key;

        if self.config.auth.enabled && !key.is_empty() {
            ConnectionInfo::authenticated(&self.bind_address().to_string(), key)
        } else {
            ConnectionInfo::anonymous(&self.bind_address().to_string())
        }
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.server.state.binding
    }
}
