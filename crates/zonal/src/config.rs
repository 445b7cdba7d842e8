//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for an [`Arena`](crate::Arena).
///
/// Validated at construction; immutable for the arena's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Baseline chunk payload size in bytes.
    ///
    /// The first chunk has exactly this size and is retained across
    /// [`Arena::clear`](crate::Arena::clear). Larger chunks are obtained by
    /// doubling this value until a request fits. Must be nonzero.
    pub chunk_size: usize,

    /// Alignment used by
    /// [`Arena::allocate_default_aligned`](crate::Arena::allocate_default_aligned).
    ///
    /// Default: pointer width. Must be a nonzero power of two.
    pub align: usize,
}

impl ArenaConfig {
    /// Default baseline chunk size: 8 KiB.
    pub const DEFAULT_CHUNK_SIZE: usize = 8192;

    /// Default alignment: the width of a pointer.
    pub const DEFAULT_ALIGN: usize = std::mem::size_of::<*const ()>();

    /// Create a config with the given baseline chunk size and default alignment.
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            align: Self::DEFAULT_ALIGN,
        }
    }

    /// Set the default alignment.
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    /// Check the config for values the arena cannot work with.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.chunk_size == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "chunk_size must be nonzero".to_string(),
            });
        }
        if !self.align.is_power_of_two() {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "align must be a nonzero power of two (got {})",
                    self.align
                ),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHUNK_SIZE)
    }
}
