use serde::{Deserialize, Serialize};

/// Liveness payload returned by `/api/health`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Health {
    pub ok: bool,
    pub time: String,
}

/// Build version payload returned by `/api/version`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Version {
    pub version: String,
}
