// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Default number of times an event is offered to the sink per pass.
pub const DEFAULT_MAX_DELIVERY_ATTEMPTS: u32 = 3;

/// Tunables for the negotiation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// When set, video meeting references are rendered as `<base>/<token>`.
    pub meeting_link_base: Option<String>,
    /// Attempts per delivery pass before an event is left in the outbox.
    pub max_delivery_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            meeting_link_base: None,
            max_delivery_attempts: DEFAULT_MAX_DELIVERY_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    /// Renders a meeting reference from a fresh token.
    #[must_use]
    pub fn meeting_reference(&self, token: &str) -> String {
        match self.meeting_link_base.as_deref().map(str::trim) {
            Some(base) if !base.is_empty() => {
                format!("{}/{token}", base.trim_end_matches('/'))
            }
            Some(_) | None => token.to_string(),
        }
    }
}
