// Copyright @yucwang 2026

use rand::rngs::StdRng;
use rand::SeedableRng;

pub type SampleRng = StdRng;

/// Independent stream for one task, fixed by the run seed and the task index
/// so results do not depend on which worker picks the task up.
pub fn task_rng(seed: u64, task: usize) -> SampleRng {
    let mixed = seed ^ (task as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    SampleRng::seed_from_u64(mixed)
}
