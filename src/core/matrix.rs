//! Subject-by-object access history.

use crate::core::error::{WallError, WallResult};

/// Largest number of cells a configured matrix may hold.
///
/// Configurations above this size are rejected before anything is allocated.
pub const MAX_CELLS: usize = 1 << 24;

/// An `n × m` table recording which subjects were granted which objects
/// during the current epoch.
///
/// Entries only go from `false` to `true` through [`grant`](Self::grant);
/// [`clear`](Self::clear) resets the whole table at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessMatrix {
    subjects: usize,
    objects: usize,
    /// Row-major cells, `subjects * objects` long.
    cells: Vec<bool>,
}

impl AccessMatrix {
    /// Checks that a `subjects × objects` matrix fits within [`MAX_CELLS`],
    /// returning its cell count.
    pub fn checked_size(subjects: usize, objects: usize) -> WallResult<usize> {
        match subjects.checked_mul(objects) {
            Some(cells) if cells <= MAX_CELLS => Ok(cells),
            _ => Err(WallError::syntax(format!(
                "a matrix of {subjects} subjects by {objects} objects exceeds the limit of {MAX_CELLS} access entries"
            ))),
        }
    }

    /// Creates an all-false matrix.
    ///
    /// The dimensions should have passed [`checked_size`](Self::checked_size).
    pub fn new(subjects: usize, objects: usize) -> Self {
        Self {
            subjects,
            objects,
            cells: vec![false; subjects * objects],
        }
    }

    /// Number of subject rows.
    pub fn subjects(&self) -> usize {
        self.subjects
    }

    /// Number of object columns.
    pub fn objects(&self) -> usize {
        self.objects
    }

    /// Validates a subject index.
    pub fn check_subject(&self, subject: usize) -> WallResult<usize> {
        if subject < self.subjects {
            Ok(subject)
        } else {
            Err(WallError::invalid_subject(subject, self.subjects))
        }
    }

    /// Validates an object index.
    pub fn check_object(&self, object: usize) -> WallResult<usize> {
        if object < self.objects {
            Ok(object)
        } else {
            Err(WallError::invalid_object(object, self.objects))
        }
    }

    fn offset(&self, subject: usize, object: usize) -> usize {
        debug_assert!(subject < self.subjects && object < self.objects);
        subject * self.objects + object
    }

    /// Returns the entry for `(subject, object)`. Indices must be valid.
    pub fn get(&self, subject: usize, object: usize) -> bool {
        self.cells[self.offset(subject, object)]
    }

    /// Sets the entry for `(subject, object)` to `true`. Indices must be valid.
    pub fn grant(&mut self, subject: usize, object: usize) {
        let offset = self.offset(subject, object);
        self.cells[offset] = true;
    }

    /// Resets every entry to `false`.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    fn row(&self, subject: usize) -> &[bool] {
        let start = subject * self.objects;
        &self.cells[start..start + self.objects]
    }

    /// Returns `true` if the subject holds nothing this epoch.
    pub fn is_row_empty(&self, subject: usize) -> bool {
        !self.row(subject).iter().any(|&cell| cell)
    }

    /// Objects held by `subject`, in index order.
    pub fn held_objects(&self, subject: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(subject)
            .iter()
            .enumerate()
            .filter_map(|(object, &held)| held.then_some(object))
    }

    /// Subjects holding `object`, in index order.
    pub fn holders(&self, object: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.subjects).filter(move |&subject| self.get(subject, object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_starts_empty() {
        let matrix = AccessMatrix::new(2, 3);
        assert!(matrix.is_row_empty(0));
        assert!(matrix.is_row_empty(1));
        assert_eq!(matrix.held_objects(0).count(), 0);
    }

    #[test]
    fn test_matrix_grant_and_clear() {
        let mut matrix = AccessMatrix::new(2, 3);
        matrix.grant(1, 2);
        matrix.grant(1, 0);
        matrix.grant(0, 2);

        assert!(matrix.get(1, 2));
        assert!(!matrix.get(0, 0));
        assert_eq!(matrix.held_objects(1).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(matrix.holders(2).collect::<Vec<_>>(), vec![0, 1]);

        matrix.clear();
        assert!(matrix.is_row_empty(0));
        assert!(matrix.is_row_empty(1));
        assert_eq!(matrix.holders(2).count(), 0);
    }

    #[test]
    fn test_matrix_size_limit() {
        assert_eq!(AccessMatrix::checked_size(2, 3).unwrap(), 6);
        assert_eq!(AccessMatrix::checked_size(1, MAX_CELLS).unwrap(), MAX_CELLS);
        assert!(matches!(
            AccessMatrix::checked_size(2, MAX_CELLS / 2 + 1),
            Err(WallError::InvalidCommandSyntax { .. })
        ));
        assert!(matches!(
            AccessMatrix::checked_size(usize::MAX, 2),
            Err(WallError::InvalidCommandSyntax { .. })
        ));
    }

    #[test]
    fn test_matrix_bounds() {
        let matrix = AccessMatrix::new(2, 3);
        assert_eq!(matrix.check_subject(1).unwrap(), 1);
        assert!(matrix.check_subject(2).is_err());
        assert_eq!(matrix.check_object(2).unwrap(), 2);
        assert!(matches!(
            matrix.check_object(3),
            Err(WallError::InvalidIndex { index: 3, bound: 3, .. })
        ));
    }
}
