//! Property tests driving the manager over random reference sequences.

use proptest::prelude::*;

use crate::manager::{AccessResult, MemoryManager};
use crate::replacement::Algorithm;
use crate::Page;

fn arb_algorithm() -> impl Strategy<Value = Algorithm> {
    prop_oneof![
        Just(Algorithm::FIFO),
        Just(Algorithm::LRU),
        Just(Algorithm::LFU),
        Just(Algorithm::Optimal),
    ]
}

fn arb_refs() -> impl Strategy<Value = Vec<Page>> {
    proptest::collection::vec(0u32..24, 1..120)
}

fn run(manager: &mut MemoryManager, refs: &[Page]) -> Vec<AccessResult> {
    refs.iter()
        .map(|&page| manager.access_page(page).unwrap())
        .collect()
}

proptest! {
    #[test]
    fn counters_track_every_access(
        algorithm in arb_algorithm(),
        refs in arb_refs(),
        num_frames in 1usize..10,
        tlb_size in 1usize..8,
    ) {
        let mut manager = MemoryManager::new(num_frames, tlb_size, algorithm).unwrap();
        manager.initialize_policy(&refs);
        run(&mut manager, &refs);

        let metrics = manager.metrics();
        prop_assert_eq!(metrics.total_accesses, refs.len() as u64);
        prop_assert!(metrics.page_faults <= metrics.total_accesses);
        prop_assert_eq!(metrics.tlb_hits + metrics.tlb_misses, metrics.total_accesses);
    }

    #[test]
    fn resident_pages_never_exceed_frames(
        algorithm in arb_algorithm(),
        refs in arb_refs(),
        num_frames in 1usize..10,
        tlb_size in 1usize..8,
    ) {
        let mut manager = MemoryManager::new(num_frames, tlb_size, algorithm).unwrap();
        manager.initialize_policy(&refs);

        for &page in &refs {
            manager.access_page(page).unwrap();
            let occupied = manager.frames().iter().filter(|slot| slot.is_some()).count();
            prop_assert_eq!(manager.mappings().len(), occupied);
            prop_assert!(occupied <= num_frames);
        }
    }

    #[test]
    fn reset_reproduces_identical_runs(
        algorithm in arb_algorithm(),
        refs in arb_refs(),
        num_frames in 1usize..10,
        tlb_size in 1usize..8,
    ) {
        let mut manager = MemoryManager::new(num_frames, tlb_size, algorithm).unwrap();
        manager.initialize_policy(&refs);
        let first = run(&mut manager, &refs);
        let first_metrics = manager.metrics();

        manager.reset();
        manager.initialize_policy(&refs);
        let second = run(&mut manager, &refs);

        prop_assert_eq!(first, second);
        prop_assert_eq!(first_metrics, manager.metrics());
    }

    #[test]
    fn independent_runs_agree(
        algorithm in arb_algorithm(),
        refs in arb_refs(),
        num_frames in 1usize..10,
        tlb_size in 1usize..8,
    ) {
        // No hidden nondeterminism: two fresh managers over the same input
        // produce the same victims in the same order.
        let mut first = MemoryManager::new(num_frames, tlb_size, algorithm).unwrap();
        first.initialize_policy(&refs);
        let mut second = MemoryManager::new(num_frames, tlb_size, algorithm).unwrap();
        second.initialize_policy(&refs);

        prop_assert_eq!(run(&mut first, &refs), run(&mut second, &refs));
    }
}
