//! Configuration for the command handler.

/// Default command prefix the chat adapter routes on.
pub const DEFAULT_PREFIX: &str = "$wheel";

/// Default interim text shown while a spin is in progress.
pub const DEFAULT_SPIN_BANNER: &str = "Spinning the wheel...";

/// Configuration for a [`WheelHandler`](crate::WheelHandler).
#[derive(Debug, Clone)]
pub struct WheelConfig {
    /// RNG seed for reproducible draws. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Prefix stripped from incoming commands when present.
    pub command_prefix: String,
    /// Text sent first on a spin and then edited into the result.
    pub spin_banner: String,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            seed: None,
            command_prefix: DEFAULT_PREFIX.to_string(),
            spin_banner: DEFAULT_SPIN_BANNER.to_string(),
        }
    }
}

impl WheelConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the command prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Set the spin banner.
    pub fn with_spin_banner(mut self, banner: impl Into<String>) -> Self {
        self.spin_banner = banner.into();
        self
    }
}
