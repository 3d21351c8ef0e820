//! Randomized browser identity for freshly provisioned sessions.

use std::time::Duration;

use rand::seq::IndexedRandom;
use rand::Rng;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/143.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/141.0.0.0 Safari/537.36",
];

#[derive(Debug, Clone)]
pub(crate) struct BrowserIdentity {
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
}

/// Picks a fresh identity. Called once per provisioning attempt so a retried
/// session never reuses the previous fingerprint.
pub(crate) fn randomize() -> BrowserIdentity {
    let mut rng = rand::rng();
    let user_agent = USER_AGENTS
        .choose(&mut rng)
        .copied()
        .unwrap_or(USER_AGENTS[0])
        .to_string();
    let window_width = rng.random_range(1280..=1920);
    let window_height = rng.random_range(720..=1080);
    BrowserIdentity {
        user_agent,
        window_width,
        window_height,
    }
}

/// Sleeps for a jittered duration within `[min_ms, max_ms]`.
pub(crate) async fn settle_delay(min_ms: u64, max_ms: u64) {
    let wait_ms = if min_ms >= max_ms {
        min_ms
    } else {
        rand::rng().random_range(min_ms..=max_ms)
    };
    tokio::time::sleep(Duration::from_millis(wait_ms)).await;
}
