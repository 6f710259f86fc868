use crate::consts::{DEFAULT_GATEWAY_URL, DEFAULT_MODEL, DEFAULT_REALTIME_URL};

/// Endpoints used by the realtime orchestrator. The gateway issues session
/// credentials; the realtime URL is the provider's SDP negotiation endpoint.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    gateway_url: String,
    realtime_url: String,
    model: String,
}

pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ConnectionConfig::new(),
        }
    }

    pub fn with_gateway_url(mut self, gateway_url: &str) -> Self {
        self.config.gateway_url = gateway_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_realtime_url(mut self, realtime_url: &str) -> Self {
        self.config.realtime_url = realtime_url.to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}

impl Default for ConnectionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            realtime_url: DEFAULT_REALTIME_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::new()
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }

    pub fn realtime_url(&self) -> &str {
        &self.realtime_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self::new()
    }
}
