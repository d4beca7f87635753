use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Browser identities rotated across attempts. The remote side appears to
/// score identities, so one that produced a failed response is never reused
/// within a run.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.2420.81",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36 OPR/108.0.0.0",
];

/// Randomized user-agent source with exclusion of known-bad identities.
pub struct UserAgentPool {
    rng: StdRng,
    /// Suffix counter for synthesized variants once the static pool is spent.
    synth_serial: u64,
}

impl UserAgentPool {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng, synth_serial: 0 }
    }

    /// Pick an identity not present in `excluded`. When every static agent is
    /// excluded, a version-bumped variant is synthesized so selection always
    /// terminates even though the run keeps excluding identities.
    pub fn next(&mut self, excluded: &HashSet<String>) -> String {
        let fully_excluded = USER_AGENTS.iter().all(|ua| excluded.contains(*ua));
        loop {
            let candidate = if fully_excluded {
                self.synth_serial += 1;
                format!(
                    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                     (KHTML, like Gecko) Chrome/124.0.{}.0 Safari/537.36",
                    self.synth_serial
                )
            } else {
                let idx = self.rng.gen_range(0..USER_AGENTS.len());
                USER_AGENTS[idx].to_string()
            };
            if !excluded.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> UserAgentPool {
        UserAgentPool::from_rng(StdRng::seed_from_u64(7))
    }

    #[test]
    fn never_returns_excluded_agent() {
        let mut pool = seeded();
        let mut excluded = HashSet::new();
        // Exclude all but one static agent; only the survivor may be picked.
        for ua in &USER_AGENTS[1..] {
            excluded.insert(ua.to_string());
        }
        for _ in 0..50 {
            assert_eq!(pool.next(&excluded), USER_AGENTS[0]);
        }
    }

    #[test]
    fn terminates_when_whole_pool_is_excluded() {
        let mut pool = seeded();
        let mut excluded: HashSet<String> =
            USER_AGENTS.iter().map(|ua| ua.to_string()).collect();
        let a = pool.next(&excluded);
        assert!(!excluded.contains(&a));
        excluded.insert(a.clone());
        let b = pool.next(&excluded);
        assert_ne!(a, b);
    }
}
