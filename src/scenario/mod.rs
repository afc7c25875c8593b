use crate::errors::err::HeapError;
use crate::heap::object::HeapObject;
use crate::heap::Heap;

/// plain-data placement of one object, as a scenario or the REPL describes it
#[derive(Debug, Clone)]
pub struct ObjectSpec {
    pub id: String,
    pub address: usize,
    pub size: usize,
    pub fields: Vec<Option<usize>>,
}

impl ObjectSpec {
    pub(crate) fn into_object(self) -> HeapObject {
        HeapObject::new(self.id, self.address, self.size, self.fields)
    }
}

/// everything needed to set up a heap: capacity, initial objects and the
/// root. the only configured input the core accepts; validation happens
/// when the heap is built from it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub memory_size: usize,
    pub objects: Vec<ObjectSpec>,
    pub root: Option<usize>,
}

impl Scenario {
    pub fn build(self) -> Result<Heap, HeapError> {
        let objects = self
            .objects
            .into_iter()
            .map(ObjectSpec::into_object)
            .collect();
        Heap::new(self.memory_size, objects, self.root)
    }

    /// the teaching layout: A points at B and C, B points at C again, and D
    /// sits unreachable near the end of the heap
    pub fn demo() -> Self {
        Scenario {
            memory_size: 36,
            objects: vec![
                ObjectSpec {
                    id: "A".into(),
                    address: 2,
                    size: 4,
                    fields: vec![Some(8), Some(14), None],
                },
                ObjectSpec {
                    id: "B".into(),
                    address: 8,
                    size: 3,
                    fields: vec![Some(14), None],
                },
                ObjectSpec {
                    id: "C".into(),
                    address: 14,
                    size: 3,
                    fields: vec![None, None],
                },
                ObjectSpec {
                    id: "D".into(),
                    address: 22,
                    size: 5,
                    fields: vec![None, None, None, None],
                },
            ],
            root: Some(2),
        }
    }
}
