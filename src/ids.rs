//! Fresh identifier values in the shapes Cursor persists.

use rand::RngCore;
use uuid::Uuid;

/// The four telemetry identifiers stored in storage.json. Every value is
/// independently random per run; nothing is derived from hardware or from
/// any other value in the set.
#[derive(Debug, Clone)]
pub struct IdentifierSet {
    pub machine_id: String,
    pub mac_machine_id: String,
    pub dev_device_id: String,
    pub sqm_id: String,
}

impl IdentifierSet {
    /// Generates a complete set of fresh values.
    pub fn generate() -> Self {
        Self {
            machine_id: long_hex_token(),
            mac_machine_id: long_hex_token(),
            dev_device_id: Uuid::new_v4().to_string(),
            sqm_id: braced_uuid(),
        }
    }
}

/// 128 lowercase hex characters: two independent 32-byte random values,
/// hex-encoded and concatenated.
fn long_hex_token() -> String {
    let mut token = String::with_capacity(128);
    for _ in 0..2 {
        let mut half = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut half);
        token.push_str(&hex::encode(half));
    }
    token
}

/// Random UUID rendered uppercase inside braces, the shape Windows SQM
/// expects, e.g. `{123E4567-E89B-42D3-A456-426655440000}`.
fn braced_uuid() -> String {
    format!("{{{}}}", Uuid::new_v4().to_string().to_uppercase())
}
