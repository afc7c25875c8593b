use crate::heap::Heap;
use fxhash::FxHashMap;

/// old header address -> planned header address, for marked objects only.
/// built once per cycle and discarded at the next mark.
pub type AddressMapping = FxHashMap<usize, usize>;

/// assigns every marked object a dense target address and retargets all
/// pointers to the planned layout. nothing moves yet: this is the
/// allocate-before-move half of a mark-compact cycle.
///
/// the object list is already address-sorted, which is the low-to-high bump
/// scan order; a cursor walks it, handing each marked object the next free
/// slot and skipping garbage entirely. afterwards every field holding a
/// mapped address is rewritten to the new one, unmapped values stay as
/// stale references (their owners are garbage and will never be followed),
/// the root follows the mapping or clears, and `next_free` becomes the
/// final cursor.
pub fn prepare(heap: &mut Heap) -> AddressMapping {
    let mut mapping = AddressMapping::default();
    let mut cursor = 0;
    for obj in heap.objects.iter_mut() {
        if !obj.marked {
            continue;
        }
        obj.planned_address = Some(cursor);
        mapping.insert(obj.address, cursor);
        cursor += obj.size;
    }

    for obj in heap.objects.iter_mut() {
        for field in obj.fields.iter_mut() {
            if let Some(addr) = field {
                if let Some(&target) = mapping.get(addr) {
                    *field = Some(target);
                }
            }
        }
    }

    heap.root = heap.root.and_then(|root| mapping.get(&root).copied());
    heap.next_free = cursor;
    mapping
}
