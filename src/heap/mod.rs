use crate::errors::err::HeapError;
use crate::heap::object::HeapObject;
use fxhash::FxHashMap;

pub mod object;

/// the simulated address space: a fixed number of cells and the objects
/// occupying them. objects are kept sorted by ascending address, which is
/// both the read view handed to callers and the scan order of the planner.
///
/// every constructor and mutator re-establishes the layout invariants:
/// no two objects overlap, every object fits inside `memory_size`, each
/// object carries exactly `size - 1` fields, and the root (if any) is the
/// header address of a real object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heap {
    pub(crate) memory_size: usize,
    pub(crate) objects: Vec<HeapObject>,
    pub(crate) root: Option<usize>,
    pub(crate) next_free: usize,
}

impl Heap {
    pub fn new(
        memory_size: usize,
        mut objects: Vec<HeapObject>,
        root: Option<usize>,
    ) -> Result<Self, HeapError> {
        objects.sort_by_key(|obj| obj.address);
        for obj in &objects {
            validate_shape(obj)?;
            if obj.end() > memory_size {
                return Err(HeapError::malformed(format!(
                    "object {} ends at {} but the heap has only {} cells",
                    obj.id,
                    obj.end(),
                    memory_size
                )));
            }
        }
        // sorted, so overlap can only happen between neighbours
        for pair in objects.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(HeapError::malformed(format!(
                    "objects {} and {} overlap",
                    pair[0].id, pair[1].id
                )));
            }
        }
        if let Some(root) = root {
            if !objects.iter().any(|obj| obj.address == root) {
                return Err(HeapError::malformed(format!(
                    "root {root} is not the address of any object"
                )));
            }
        }
        let next_free = objects.last().map(HeapObject::end).unwrap_or(0);
        Ok(Self {
            memory_size,
            objects,
            root,
            next_free,
        })
    }

    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    /// read-only view, ordered by ascending address
    pub fn objects(&self) -> &[HeapObject] {
        &self.objects
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// first address past all objects: the bump-pointer allocation boundary
    pub fn next_free(&self) -> usize {
        self.next_free
    }

    pub fn object_at(&self, address: usize) -> Option<&HeapObject> {
        self.objects.iter().find(|obj| obj.address == address)
    }

    pub fn object_by_id(&self, id: &str) -> Option<&HeapObject> {
        self.objects.iter().find(|obj| obj.id == id)
    }

    /// header address -> position in the sorted object list
    pub(crate) fn address_index(&self) -> FxHashMap<usize, usize> {
        self.objects
            .iter()
            .enumerate()
            .map(|(pos, obj)| (obj.address, pos))
            .collect()
    }

    /// repoint the root, or clear it. the target must be the header of an
    /// existing object so well-formed scenarios never start from a dangling
    /// root.
    pub(crate) fn set_root(&mut self, root: Option<usize>) -> Result<(), HeapError> {
        if let Some(root) = root {
            if self.object_at(root).is_none() {
                return Err(HeapError::malformed(format!(
                    "root {root} is not the address of any object"
                )));
            }
        }
        self.root = root;
        Ok(())
    }

    /// place a new object, keeping the list address-sorted. shape violations
    /// are malformed input; geometry violations mean the object does not fit.
    pub(crate) fn insert(&mut self, obj: HeapObject) -> Result<(), HeapError> {
        validate_shape(&obj)?;
        if obj.end() > self.memory_size {
            return Err(HeapError::no_space(format!(
                "object {} ends at {} but the heap has only {} cells",
                obj.id,
                obj.end(),
                self.memory_size
            )));
        }
        if let Some(other) = self.objects.iter().find(|other| other.overlaps(&obj)) {
            return Err(HeapError::no_space(format!(
                "object {} would overlap {}",
                obj.id, other.id
            )));
        }
        self.next_free = self.next_free.max(obj.end());
        let pos = self
            .objects
            .partition_point(|other| other.address < obj.address);
        self.objects.insert(pos, obj);
        Ok(())
    }
}

fn validate_shape(obj: &HeapObject) -> Result<(), HeapError> {
    if obj.size < 1 {
        return Err(HeapError::malformed(format!(
            "object {} has size 0; the header alone takes one cell",
            obj.id
        )));
    }
    if obj.fields.len() != obj.size - 1 {
        return Err(HeapError::malformed(format!(
            "object {} has size {} but {} fields",
            obj.id,
            obj.size,
            obj.fields.len()
        )));
    }
    Ok(())
}
