/// Errors that can occur while talking to the MQTT broker.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The broker rejected or dropped the connection during startup.
    #[error("broker connection failed: {0}")]
    Connection(#[from] rumqttc::ConnectionError),

    /// The request channel to the connection driver is gone.
    #[error("mqtt client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    /// Discovery payload serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The connection driver thread could not be spawned.
    #[error("failed to spawn mqtt driver thread: {0}")]
    Spawn(std::io::Error),

    /// The connection closed before the broker acknowledged it.
    #[error("connection closed before broker acknowledgement")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, PublishError>;
