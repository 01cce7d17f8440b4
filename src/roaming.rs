//! Channel hopping table cursor
//!
//! Both ends of a link walk the same hopping table in the same order. The
//! engine only tracks the position; applying a channel to the chip is done by
//! [`Nrf905::roam`](crate::Nrf905::roam).

use crate::Error;

/// Cyclic cursor over a caller-owned hopping table
#[derive(Debug, Clone)]
pub struct RoamingEngine<'t> {
    table: &'t [u16],
    index: usize,
}

impl<'t> RoamingEngine<'t> {
    /// Starts at the first table entry.
    ///
    /// # Errors
    /// * `Error::EmptyHoppingTable` - `table` has no entries
    pub fn new(table: &'t [u16]) -> Result<Self, Error> {
        if table.is_empty() {
            return Err(Error::EmptyHoppingTable);
        }
        Ok(Self { table, index: 0 })
    }

    /// Channel at the current position.
    pub fn current(&self) -> u16 {
        self.table[self.index]
    }

    /// Returns the channel at the current position and moves to the next
    /// one, wrapping at the end of the table.
    pub fn advance(&mut self) -> u16 {
        let channel = self.table[self.index];
        self.index = (self.index + 1) % self.table.len();
        channel
    }

    /// Index of the entry the next [`advance`](Self::advance) returns.
    pub fn position(&self) -> usize {
        self.index
    }

    /// The hopping table being walked.
    pub fn table(&self) -> &'t [u16] {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_is_rejected() {
        assert_eq!(RoamingEngine::new(&[]).unwrap_err(), Error::EmptyHoppingTable);
    }

    #[test]
    fn walks_the_table_in_order() {
        let table = [3, 17, 42];
        let mut engine = RoamingEngine::new(&table).unwrap();
        assert_eq!(engine.current(), 3);
        assert_eq!(engine.advance(), 3);
        assert_eq!(engine.advance(), 17);
        assert_eq!(engine.advance(), 42);
        assert_eq!(engine.advance(), 3);
    }

    #[test]
    fn returns_to_start_after_one_lap() {
        let table = [5, 9, 11, 200, 7];
        let mut engine = RoamingEngine::new(&table).unwrap();
        for _ in 0..table.len() {
            engine.advance();
        }
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn single_entry_table_stays_put() {
        let table = [8];
        let mut engine = RoamingEngine::new(&table).unwrap();
        assert_eq!(engine.advance(), 8);
        assert_eq!(engine.position(), 0);
        assert_eq!(engine.table(), &[8u16]);
    }
}
