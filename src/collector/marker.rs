use crate::heap::Heap;
use bitvec::prelude::*;

/// flips `marked` on every object reachable from the heap root.
///
/// pre-order depth-first walk: the root object first, then its fields in
/// declaration order, descending into each pointee before the next field.
/// the walk runs on an explicit stack so a pointer chain as long as the heap
/// itself cannot exhaust the call stack, and a visited bitmap keyed on the
/// header address caps every object at one visit, cycles included.
///
/// all marks are cleared up front, so running this twice against the same
/// root lands on the same marked set.
pub fn mark(heap: &mut Heap) {
    for obj in heap.objects.iter_mut() {
        obj.marked = false;
    }
    let Some(root) = heap.root else {
        return;
    };

    let index = heap.address_index();
    let mut visited: BitVec = bitvec![0; heap.memory_size];
    let mut pending = vec![root];
    while let Some(addr) = pending.pop() {
        // a field naming no live header is a dangling pointer: a
        // non-traversable leaf, not an error
        let Some(&pos) = index.get(&addr) else {
            continue;
        };
        if visited[addr] {
            continue;
        }
        visited.set(addr, true);
        let obj = &mut heap.objects[pos];
        obj.marked = true;
        // pushed in reverse so the pop order matches field order
        for field in obj.fields.iter().rev().flatten() {
            pending.push(*field);
        }
    }
}
