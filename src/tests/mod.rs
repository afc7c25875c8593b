#[cfg(test)]
mod end_to_end_tests {
    use crate::collector::{AddressMapping, Collector, Phase};
    use crate::scenario::Scenario;

    #[test]
    fn full_cycle_over_the_demo_scenario() {
        let mut gc = Collector::new(Scenario::demo()).unwrap();
        assert_eq!(gc.heap().memory_size(), 36);
        assert_eq!(gc.heap().root(), Some(2));

        gc.mark().unwrap();
        for id in ["A", "B", "C"] {
            assert!(gc.heap().object_by_id(id).unwrap().marked, "{id} is reachable");
        }
        assert!(!gc.heap().object_by_id("D").unwrap().marked);

        gc.prepare().unwrap();
        let expected: AddressMapping = [(2, 0), (8, 4), (14, 7)].into_iter().collect();
        assert_eq!(gc.mapping(), &expected);
        assert_eq!(
            gc.heap().object_by_id("A").unwrap().fields,
            vec![Some(4), Some(7), None]
        );
        assert_eq!(gc.heap().root(), Some(0));
        assert_eq!(gc.heap().next_free(), 10);

        gc.crunch().unwrap();
        let addresses: Vec<usize> = gc.heap().objects().iter().map(|obj| obj.address).collect();
        assert_eq!(addresses, vec![0, 4, 7]);
        assert!(gc.heap().object_by_id("D").is_none());
    }

    #[test]
    fn three_undos_restore_the_pre_mark_state() {
        let mut gc = Collector::new(Scenario::demo()).unwrap();
        let objects = gc.heap().objects().to_vec();
        let root = gc.heap().root();
        let next_free = gc.heap().next_free();
        let mapping = gc.mapping().clone();

        gc.mark().unwrap();
        gc.prepare().unwrap();
        gc.crunch().unwrap();
        gc.undo().unwrap();
        gc.undo().unwrap();
        gc.undo().unwrap();

        assert_eq!(gc.phase(), Phase::Idle);
        assert_eq!(gc.heap().objects(), objects.as_slice());
        assert_eq!(gc.heap().root(), root);
        assert_eq!(gc.heap().next_free(), next_free);
        assert_eq!(gc.mapping(), &mapping);
        assert!(!gc.can_undo());
    }

    #[test]
    fn a_second_cycle_runs_after_reset() {
        let mut gc = Collector::new(Scenario::demo()).unwrap();
        gc.mark().unwrap();
        gc.prepare().unwrap();
        gc.crunch().unwrap();
        gc.reset(Scenario::demo()).unwrap();

        gc.set_root(Some(8)).unwrap();
        gc.mark().unwrap();
        gc.prepare().unwrap();
        gc.crunch().unwrap();
        // rooted at B: only B and C survive, compacted to the base
        let placed: Vec<(&str, usize)> = gc
            .heap()
            .objects()
            .iter()
            .map(|obj| (obj.id.as_str(), obj.address))
            .collect();
        assert_eq!(placed, vec![("B", 0), ("C", 3)]);
        assert_eq!(gc.heap().root(), Some(0));
        assert_eq!(gc.heap().next_free(), 6);
    }
}

#[cfg(test)]
mod properties {
    use crate::collector::{cruncher, marker, planner};
    use crate::heap::Heap;
    use crate::scenario::{ObjectSpec, Scenario};
    use proptest::prelude::*;

    /// (size, gap) pairs fix the layout low to high; field targets and the
    /// root are then drawn as indices into the placed objects, so every
    /// generated scenario is well formed
    fn arb_scenario() -> impl Strategy<Value = Scenario> {
        prop::collection::vec((1usize..=5, 0usize..=3), 1..8).prop_flat_map(|shape| {
            let mut cursor = 0;
            let mut placements = Vec::new();
            for &(size, gap) in &shape {
                cursor += gap;
                placements.push((cursor, size));
                cursor += size;
            }
            let memory_size = cursor + 2;
            let addresses: Vec<usize> = placements.iter().map(|&(addr, _)| addr).collect();
            let field_count: usize = placements.iter().map(|&(_, size)| size - 1).sum();
            let fields =
                prop::collection::vec(prop::option::of(0..addresses.len()), field_count);
            let root = prop::option::of(0..addresses.len());
            (fields, root).prop_map(move |(field_picks, root_pick)| {
                let mut picks = field_picks.into_iter();
                let objects = placements
                    .iter()
                    .enumerate()
                    .map(|(i, &(address, size))| ObjectSpec {
                        id: format!("o{i}"),
                        address,
                        size,
                        fields: (0..size - 1)
                            .map(|_| picks.next().unwrap().map(|idx| addresses[idx]))
                            .collect(),
                    })
                    .collect();
                Scenario {
                    memory_size,
                    objects,
                    root: root_pick.map(|idx| addresses[idx]),
                }
            })
        })
    }

    fn layout_ok(heap: &Heap) -> bool {
        heap.objects()
            .windows(2)
            .all(|pair| pair[0].end() <= pair[1].address)
            && heap
                .objects()
                .iter()
                .all(|obj| obj.end() <= heap.memory_size())
    }

    proptest! {
        #[test]
        fn layout_invariant_holds_at_every_phase(scenario in arb_scenario()) {
            let mut heap = scenario.build().unwrap();
            prop_assert!(layout_ok(&heap));
            marker::mark(&mut heap);
            prop_assert!(layout_ok(&heap));
            planner::prepare(&mut heap);
            prop_assert!(layout_ok(&heap));
            cruncher::crunch(&mut heap);
            prop_assert!(layout_ok(&heap));
        }

        #[test]
        fn marking_twice_equals_marking_once(scenario in arb_scenario()) {
            let mut once = scenario.build().unwrap();
            marker::mark(&mut once);
            let mut twice = once.clone();
            marker::mark(&mut twice);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn planned_addresses_are_dense_from_zero(scenario in arb_scenario()) {
            let mut heap = scenario.build().unwrap();
            marker::mark(&mut heap);
            planner::prepare(&mut heap);
            let mut cursor = 0;
            for obj in heap.objects() {
                match obj.planned_address {
                    Some(planned) => {
                        prop_assert!(obj.marked);
                        prop_assert_eq!(planned, cursor);
                        cursor += obj.size;
                    }
                    None => prop_assert!(!obj.marked),
                }
            }
            prop_assert_eq!(heap.next_free(), cursor);
        }

        #[test]
        fn surviving_pointers_land_on_planned_addresses(scenario in arb_scenario()) {
            let mut heap = scenario.build().unwrap();
            marker::mark(&mut heap);
            let before = heap.clone();
            planner::prepare(&mut heap);
            for (obj, old_obj) in heap.objects().iter().zip(before.objects()) {
                if !obj.marked {
                    continue;
                }
                for (field, old_field) in obj.fields.iter().zip(&old_obj.fields) {
                    let Some(old_addr) = old_field else { continue };
                    let Some(pointee) = before.object_at(*old_addr) else { continue };
                    if pointee.marked {
                        let planned = heap.object_by_id(&pointee.id).unwrap().planned_address;
                        prop_assert_eq!(*field, planned);
                    } else {
                        // stale reference into garbage, left as it was
                        prop_assert_eq!(field, old_field);
                    }
                }
            }
        }

        #[test]
        fn crunch_keeps_exactly_the_marked_objects(scenario in arb_scenario()) {
            let mut heap = scenario.build().unwrap();
            marker::mark(&mut heap);
            let marked: Vec<String> = heap
                .objects()
                .iter()
                .filter(|obj| obj.marked)
                .map(|obj| obj.id.clone())
                .collect();
            planner::prepare(&mut heap);
            cruncher::crunch(&mut heap);
            let survivors: Vec<String> =
                heap.objects().iter().map(|obj| obj.id.clone()).collect();
            prop_assert_eq!(survivors, marked);
        }
    }
}
