use crate::heap::Heap;

/// realizes the plan: garbage is dropped for good and every survivor takes
/// its planned address, ready for the next cycle with `marked` and
/// `planned_address` cleared. the root and `next_free` computed by the
/// planner carry through unchanged.
pub fn crunch(heap: &mut Heap) {
    heap.objects.retain(|obj| obj.marked);
    for obj in heap.objects.iter_mut() {
        if let Some(planned) = obj.planned_address.take() {
            obj.address = planned;
        }
        obj.marked = false;
    }
    // planned addresses were handed out in ascending old-address order, so
    // the list is already sorted; keep the invariant explicit anyway
    heap.objects.sort_by_key(|obj| obj.address);
}
