//! Post Store configuration.

/// Limits applied by the post lifecycle state machine.
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Deepest allowed nesting level, 1-based. The protocol ships four
    /// families; deployments may cap threads shallower than that.
    pub max_nesting_depth: u8,
    /// Maximum message byte length.
    pub max_message_len: usize,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 4,
            max_message_len: 444,
        }
    }
}
