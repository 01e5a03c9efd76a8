//! Merged result of a fan-out.

use std::fmt;
use std::slice;
use std::vec;

use thiserror::Error;

use crate::Fault;

/// A fault tagged with the launch index of the unit of work that raised it.
#[derive(Debug)]
pub struct IndexedFault {
    pub index: usize,
    pub fault: Fault,
}

/// Every fault captured by one fan-out, ordered by launch index.
///
/// Never empty: a fan-out with no faults reports `Ok(())` instead.
#[derive(Debug, Error)]
#[error("{}", JoinedMessages(.faults))]
pub struct FaultSet {
    faults: Vec<IndexedFault>,
}

impl FaultSet {
    /// Collect faults into a set, sorted by index. Returns `None` when there
    /// are none.
    pub fn from_indexed(faults: impl IntoIterator<Item = (usize, Fault)>) -> Option<Self> {
        let mut faults: Vec<IndexedFault> = faults
            .into_iter()
            .map(|(index, fault)| IndexedFault { index, fault })
            .collect();
        if faults.is_empty() {
            return None;
        }
        faults.sort_by_key(|entry| entry.index);
        Some(Self { faults })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.faults.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty()
    }

    /// Fault with the lowest launch index.
    #[must_use]
    pub fn first(&self) -> &Fault {
        &self.faults[0].fault
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fault> {
        self.faults.iter().map(|entry| &entry.fault)
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.faults.iter().map(|entry| entry.index)
    }

    pub fn entries(&self) -> slice::Iter<'_, IndexedFault> {
        self.faults.iter()
    }

    /// Fault raised by the unit of work launched at `index`, if it faulted.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Fault> {
        self.faults
            .binary_search_by_key(&index, |entry| entry.index)
            .ok()
            .map(|pos| &self.faults[pos].fault)
    }

    #[must_use]
    pub fn into_faults(self) -> Vec<Fault> {
        self.faults.into_iter().map(|entry| entry.fault).collect()
    }
}

impl IntoIterator for FaultSet {
    type Item = IndexedFault;
    type IntoIter = vec::IntoIter<IndexedFault>;

    fn into_iter(self) -> Self::IntoIter {
        self.faults.into_iter()
    }
}

struct JoinedMessages<'a>(&'a [IndexedFault]);

impl fmt::Display for JoinedMessages<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(&entry.fault, f)?;
        }
        Ok(())
    }
}
