use std::fmt;
use std::fmt::Formatter;

/// one simulated object: a header cell at `address` followed by `size - 1`
/// field cells. a field either holds the address of another object's header
/// or is empty.
///
/// `marked` and `planned_address` are per-cycle attributes: marking sets the
/// former, planning sets the latter, and the crunch clears both on the
/// survivors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapObject {
    pub id: String,
    pub address: usize,
    pub size: usize,
    pub fields: Vec<Option<usize>>,
    pub marked: bool,
    pub planned_address: Option<usize>,
}

impl HeapObject {
    pub fn new(
        id: impl Into<String>,
        address: usize,
        size: usize,
        fields: Vec<Option<usize>>,
    ) -> Self {
        Self {
            id: id.into(),
            address,
            size,
            fields,
            marked: false,
            planned_address: None,
        }
    }

    /// first address past this object's last cell
    pub fn end(&self) -> usize {
        self.address + self.size
    }

    pub fn overlaps(&self, other: &HeapObject) -> bool {
        self.address < other.end() && other.address < self.end()
    }
}

impl fmt::Display for HeapObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|fld| match fld {
                Some(addr) => addr.to_string(),
                None => "_".to_string(),
            })
            .collect();
        write!(
            f,
            "{} @{} size={} fields=[{}]",
            self.id,
            self.address,
            self.size,
            fields.join(", ")
        )?;
        if self.marked {
            write!(f, " marked")?;
        }
        if let Some(planned) = self.planned_address {
            write!(f, " -> {planned}")?;
        }
        Ok(())
    }
}
