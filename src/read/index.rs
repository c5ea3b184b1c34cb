//! Fixed-size open-addressing index over entry names.
//!
//! The archive's entry count is known before the walk begins, so the table
//! is allocated once at its final size and never resized. Slots hold only
//! a name view (offset and length within the central directory mapping)
//! plus the record offset; entry fields stay on disk until a lookup
//! decodes them. Insertion and lookup share one probe sequence, which
//! makes the duplicate-name policy an observable contract: the first
//! occurrence of a name wins, later duplicates are skipped.

/// Occupancy ceiling for the table: sized so at most 3 of every 4 slots
/// fill, keeping probe sequences short at the cost of one extra bit of
/// capacity.
const MAX_LOAD_NUM: usize = 3;
const MAX_LOAD_DEN: usize = 4;

/// One occupied bucket: a name view into the mapping plus the offset of
/// the owning central directory record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Slot {
    pub name_off: u32,
    pub name_len: u16,
    pub record_off: u32,
}

/// The fixed-capacity name table.
pub(crate) struct NameIndex {
    slots: Vec<Option<Slot>>,
    mask: usize,
    len: usize,
}

impl NameIndex {
    /// Allocates a table sized for `entries` names.
    ///
    /// Capacity is the next power of two that keeps occupancy at or below
    /// 3/4, so there is always at least one empty slot and probe loops
    /// terminate.
    pub fn with_entry_capacity(entries: usize) -> Self {
        let capacity = (entries * MAX_LOAD_DEN / MAX_LOAD_NUM + 1).next_power_of_two();
        Self {
            slots: vec![None; capacity],
            mask: capacity - 1,
            len: 0,
        }
    }

    /// Number of occupied slots (distinct names).
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Table capacity in slots.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Inserts a name, where `name_off`/`name_len` locate the raw bytes in
    /// `cd` and `record_off` is the owning record's offset.
    ///
    /// Returns `false` without modifying the table when an equal name is
    /// already present (first occurrence wins).
    pub fn insert(&mut self, cd: &[u8], name_off: u32, name_len: u16, record_off: u32) -> bool {
        let name = &cd[name_off as usize..name_off as usize + name_len as usize];
        let mut i = hash_name(name) as usize & self.mask;
        loop {
            match self.slots[i] {
                None => {
                    self.slots[i] = Some(Slot {
                        name_off,
                        name_len,
                        record_off,
                    });
                    self.len += 1;
                    return true;
                }
                Some(slot) if slot_matches(&slot, cd, name) => return false,
                Some(_) => i = (i + 1) & self.mask,
            }
        }
    }

    /// Looks up a name, returning the record offset of its first
    /// occurrence. Probing stops at the first empty slot (a miss).
    pub fn lookup(&self, cd: &[u8], name: &[u8]) -> Option<u32> {
        let mut i = hash_name(name) as usize & self.mask;
        loop {
            match self.slots[i] {
                None => return None,
                Some(slot) if slot_matches(&slot, cd, name) => return Some(slot.record_off),
                Some(_) => i = (i + 1) & self.mask,
            }
        }
    }
}

/// Length first, then raw bytes; names are never assumed terminated or
/// ASCII.
#[inline]
fn slot_matches(slot: &Slot, cd: &[u8], name: &[u8]) -> bool {
    slot.name_len as usize == name.len()
        && &cd[slot.name_off as usize..slot.name_off as usize + slot.name_len as usize] == name
}

/// Rolling 31-multiplier hash over the raw name bytes.
#[inline]
pub(crate) fn hash_name(name: &[u8]) -> u32 {
    name.iter()
        .fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(b as u32))
}
