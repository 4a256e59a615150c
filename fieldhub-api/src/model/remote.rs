use serde::{Deserialize, Serialize};

/// Where the remote backend lives.
///
/// Supplied either by the application config (`"remote"` section) or directly
/// through `connect_backend`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    #[serde(default = "default_http_protocol")]
    http_protocol: String,
    http_host: String,
    #[serde(default = "default_http_port")]
    http_port: u16,
    #[serde(default = "default_mqtt_protocol")]
    mqtt_protocol: String,
    #[serde(default)]
    mqtt_host: Option<String>,
    #[serde(default = "default_mqtt_port")]
    mqtt_port: u16,
}

fn default_http_protocol() -> String {
    "https".to_string()
}
fn default_http_port() -> u16 {
    443
}
fn default_mqtt_protocol() -> String {
    "tcp".to_string()
}
fn default_mqtt_port() -> u16 {
    1883
}

impl RemoteConfig {
    /// Creates a remote on `host` with the default protocols and ports.
    pub fn new(http_host: impl Into<String>) -> Self {
        Self {
            http_protocol: default_http_protocol(),
            http_host: http_host.into(),
            http_port: default_http_port(),
            mqtt_protocol: default_mqtt_protocol(),
            mqtt_host: None,
            mqtt_port: default_mqtt_port(),
        }
    }

    pub fn with_http(mut self, protocol: impl Into<String>, port: u16) -> Self {
        self.http_protocol = protocol.into();
        self.http_port = port;
        self
    }

    pub fn with_mqtt(mut self, protocol: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        self.mqtt_protocol = protocol.into();
        self.mqtt_host = Some(host.into());
        self.mqtt_port = port;
        self
    }

    pub fn http_host(&self) -> &str {
        &self.http_host
    }

    /// e.g. `https://field.example.org:443`
    pub fn http_uri(&self) -> String {
        format!("{}://{}:{}", self.http_protocol, self.http_host, self.http_port)
    }

    /// The broker falls back to the HTTP host when no dedicated host is set.
    pub fn mqtt_uri(&self) -> String {
        let host = self.mqtt_host.as_deref().unwrap_or(&self.http_host);
        format!("{}://{}:{}", self.mqtt_protocol, host, self.mqtt_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let remote: RemoteConfig = serde_json::from_str(r#"{ "http_host": "field.example.org" }"#).unwrap();
        assert_eq!(remote.http_uri(), "https://field.example.org:443");
        assert_eq!(remote.mqtt_uri(), "tcp://field.example.org:1883");
    }

    #[test]
    fn test_dedicated_mqtt_host() {
        let remote = RemoteConfig::new("api.local")
            .with_http("http", 8085)
            .with_mqtt("tcp", "broker.local", 1884);
        assert_eq!(remote.http_uri(), "http://api.local:8085");
        assert_eq!(remote.mqtt_uri(), "tcp://broker.local:1884");
    }
}
