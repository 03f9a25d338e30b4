//! Fuzz target: `ButtonConfig` postcard decoder
//!
//! Feeds arbitrary bytes to `ButtonConfig::from_bytes` and verifies:
//! - No panics on malformed or truncated blobs
//! - Any accepted config resolves to thresholds and re-encodes within
//!   `CONFIG_BLOB_MAX` bytes to the same value
//!
//! cargo fuzz run fuzz_config_blob

#![no_main]

use edgeclick::config::{ButtonConfig, CONFIG_BLOB_MAX};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = ButtonConfig::from_bytes(data) else {
        return;
    };
    assert!(config.thresholds().is_ok());

    let mut buf = [0u8; CONFIG_BLOB_MAX];
    let encoded = config.to_slice(&mut buf).expect("valid config must encode");
    let decoded = ButtonConfig::from_bytes(encoded).expect("re-encoded config must decode");
    assert_eq!(decoded, config);
});
