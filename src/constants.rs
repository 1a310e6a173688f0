pub const DEFAULT_NUM_FRAMES: usize = 16;
pub const DEFAULT_TLB_SIZE: usize = 8;
