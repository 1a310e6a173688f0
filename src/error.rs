use thiserror::Error;

/// Errors surfaced by the simulator core and its input helpers.
#[derive(Debug, Error)]
pub enum SimError {
    /// Frame count and TLB size must both be positive.
    #[error("invalid configuration: {num_frames} frames, TLB size {tlb_size} (both must be positive)")]
    Config { num_frames: usize, tlb_size: usize },

    /// A page was accessed before a replacement policy was installed.
    #[error("replacement policy not initialized; call initialize_policy with the reference sequence first")]
    PolicyNotInitialized,

    /// A token in a reference string is not a non-negative integer.
    #[error("invalid page number `{token}` in reference string")]
    Parse { token: String },

    /// A reference file could not be read.
    #[error("failed to read reference file: {0}")]
    Io(#[from] std::io::Error),
}
