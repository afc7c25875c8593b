use crate::errors::err::HeapError;
use crate::heap::Heap;
use crate::scenario::{ObjectSpec, Scenario};
use log::{debug, info};
use std::fmt;
use std::fmt::Formatter;

pub mod cruncher;
pub mod marker;
pub mod planner;

pub use planner::AddressMapping;

/// where the collector stands in its strictly linear cycle. forward
/// transitions are mark, prepare and crunch; the only way out of `Crunched`
/// is a reset (or undo).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Marked,
    Prepared,
    Crunched,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "Idle",
            Phase::Marked => "Marked",
            Phase::Prepared => "Prepared",
            Phase::Crunched => "Crunched",
        };
        write!(f, "{name}")
    }
}

/// deep copy of everything a phase transition can touch. restoring one puts
/// the collector back exactly where it was.
#[derive(Debug, Clone)]
struct Snapshot {
    heap: Heap,
    phase: Phase,
    mapping: AddressMapping,
}

/// owns the simulated heap and sequences one collection cycle over it:
/// `Idle -> Marked -> Prepared -> Crunched`, each step snapshotting the
/// previous state so `undo` can walk the cycle backwards. all mutable
/// heap-wide state lives here; there are no process-wide globals.
pub struct Collector {
    heap: Heap,
    phase: Phase,
    mapping: AddressMapping,
    history: Vec<Snapshot>,
}

impl Collector {
    pub fn new(scenario: Scenario) -> Result<Self, HeapError> {
        let heap = scenario.build()?;
        Ok(Self {
            heap,
            phase: Phase::Idle,
            mapping: AddressMapping::default(),
            history: Vec::new(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// old address -> planned address pairs of the current cycle; empty
    /// until prepare has run
    pub fn mapping(&self) -> &AddressMapping {
        &self.mapping
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    fn expect_phase(&self, required: Phase) -> Result<(), HeapError> {
        if self.phase == required {
            Ok(())
        } else {
            Err(HeapError::wrong_phase(required, self.phase))
        }
    }

    fn push_snapshot(&mut self) {
        self.history.push(Snapshot {
            heap: self.heap.clone(),
            phase: self.phase,
            mapping: self.mapping.clone(),
        });
    }

    /// mark every object reachable from the root. `Idle -> Marked`
    pub fn mark(&mut self) -> Result<(), HeapError> {
        self.expect_phase(Phase::Idle)?;
        self.push_snapshot();
        self.mapping.clear();
        marker::mark(&mut self.heap);
        self.phase = Phase::Marked;
        let reachable = self.heap.objects().iter().filter(|obj| obj.marked).count();
        info!(
            "mark: {reachable} of {} objects reachable from root {:?}",
            self.heap.objects().len(),
            self.heap.root()
        );
        #[cfg(feature = "debug")]
        println!("after mark: {:#?}", self.heap);
        Ok(())
    }

    /// plan the compacted layout and retarget pointers. `Marked -> Prepared`
    pub fn prepare(&mut self) -> Result<(), HeapError> {
        self.expect_phase(Phase::Marked)?;
        self.push_snapshot();
        self.mapping = planner::prepare(&mut self.heap);
        self.phase = Phase::Prepared;
        info!(
            "prepare: {} survivors planned, next_free {}",
            self.mapping.len(),
            self.heap.next_free()
        );
        #[cfg(feature = "debug")]
        println!("after prepare: {:#?}", self.heap);
        Ok(())
    }

    /// drop garbage and move survivors to their planned addresses.
    /// `Prepared -> Crunched`
    pub fn crunch(&mut self) -> Result<(), HeapError> {
        self.expect_phase(Phase::Prepared)?;
        self.push_snapshot();
        let before = self.heap.objects().len();
        cruncher::crunch(&mut self.heap);
        self.phase = Phase::Crunched;
        info!(
            "crunch: {} objects discarded, {} survive",
            before - self.heap.objects().len(),
            self.heap.objects().len()
        );
        #[cfg(feature = "debug")]
        println!("after crunch: {:#?}", self.heap);
        Ok(())
    }

    /// step back to the state before the most recent phase transition
    pub fn undo(&mut self) -> Result<(), HeapError> {
        let snapshot = self.history.pop().ok_or(HeapError::NoHistory)?;
        debug!("undo: restoring {} phase", snapshot.phase);
        self.heap = snapshot.heap;
        self.phase = snapshot.phase;
        self.mapping = snapshot.mapping;
        Ok(())
    }

    /// start over from a scenario: fresh heap, `Idle` phase, empty mapping,
    /// no history. allowed from any phase.
    pub fn reset(&mut self, scenario: Scenario) -> Result<(), HeapError> {
        let heap = scenario.build()?;
        self.heap = heap;
        self.phase = Phase::Idle;
        self.mapping.clear();
        self.history.clear();
        info!(
            "reset: {} objects in a heap of {} cells",
            self.heap.objects().len(),
            self.heap.memory_size()
        );
        Ok(())
    }

    /// repoint or clear the root. only while `Idle`: changing the entry
    /// point mid-cycle would invalidate the marked set and the mapping.
    pub fn set_root(&mut self, root: Option<usize>) -> Result<(), HeapError> {
        self.expect_phase(Phase::Idle)?;
        self.heap.set_root(root)
    }

    /// place a new object while `Idle`, space permitting
    pub fn insert_object(&mut self, spec: ObjectSpec) -> Result<(), HeapError> {
        self.expect_phase(Phase::Idle)?;
        self.heap.insert(spec.into_object())
    }
}
