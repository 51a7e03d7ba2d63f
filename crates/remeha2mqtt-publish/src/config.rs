use std::fmt;

/// Connection settings for the MQTT broker.
///
/// Credentials are only applied when both username and password are set.
#[derive(Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    /// Broker hostname or address.
    pub host: String,
    /// Broker TCP port.
    pub port: u16,
    /// Username, if the broker requires authentication.
    pub username: Option<String>,
    /// Password belonging to `username`. Redacted in debug output.
    pub password: Option<String>,
    /// Client identifier presented to the broker.
    pub client_id: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            username: None,
            password: None,
            client_id: "remeha_bridge".to_string(),
        }
    }
}

impl BrokerConfig {
    /// Whether both halves of the credential pair are present.
    pub fn has_credentials(&self) -> bool {
        self.username.is_some() && self.password.is_some()
    }
}

impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("BrokerConfig");
        dbg.field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("client_id", &self.client_id);
        if let Some(password) = &self.password {
            dbg.field(
                "password",
                &format_args!("<redacted:{} bytes>", password.len()),
            );
        } else {
            dbg.field("password", &Option::<String>::None);
        }
        dbg.finish()
    }
}
