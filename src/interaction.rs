//! User–artist interaction log → sparse user-by-item matrix.
//!
//! The matrix is CSR (`sprs::CsMat`), zero-indexed, and sized by the largest
//! ids observed: `(max user_id + 1) × (max item_id + 1)`. Absent cells mean no
//! interaction. Duplicate `(user, item)` pairs are summed, matching play-count
//! semantics. An empty record set builds a valid 0×0 matrix.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use sprs::{CsMat, TriMat};
use tracing::{debug, info};

use crate::error::{DataError, DataResult};
use crate::tsv;

/// Header name of the user id column.
pub const USER_COLUMN: &str = "userID";
/// Header name of the item (artist) id column.
pub const ITEM_COLUMN: &str = "artistID";
/// Header name of the weight (play count) column.
pub const WEIGHT_COLUMN: &str = "weight";

/// Largest user or item id accepted from a log. The matrix is sized by the
/// largest id, so an unbounded id would size the row index to match.
pub const MAX_ID: usize = (1 << 26) - 1;

/// One line of the interaction log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionRecord {
    pub user_id: usize,
    pub item_id: usize,
    pub weight: f64,
}

impl InteractionRecord {
    pub fn new(user_id: usize, item_id: usize, weight: f64) -> Self {
        Self {
            user_id,
            item_id,
            weight,
        }
    }

    /// Parse the three raw fields of data row `row` (1-based, header excluded).
    pub fn parse(row: usize, user: &str, item: &str, weight: &str) -> DataResult<Self> {
        let malformed = |reason: String| DataError::MalformedRecord { row, reason };

        let user_id = user
            .trim()
            .parse::<usize>()
            .map_err(|_| malformed(format!("invalid user id \"{user}\"")))?;
        let item_id = item
            .trim()
            .parse::<usize>()
            .map_err(|_| malformed(format!("invalid item id \"{item}\"")))?;
        if user_id > MAX_ID || item_id > MAX_ID {
            return Err(malformed(format!(
                "id out of range: ids must not exceed {MAX_ID}"
            )));
        }
        let weight_value = weight
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(format!("invalid weight \"{weight}\"")))?;

        if !weight_value.is_finite() || weight_value < 0.0 {
            return Err(malformed(format!(
                "weight must be a non-negative finite number, got \"{weight}\""
            )));
        }

        Ok(Self::new(user_id, item_id, weight_value))
    }
}

/// Immutable sparse user-by-item weight matrix.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    inner: CsMat<f64>,
}

impl InteractionMatrix {
    /// Build a matrix from records in one pass. See [`InteractionMatrixBuilder`].
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = InteractionRecord>,
    {
        let mut builder = InteractionMatrixBuilder::new();
        for record in records {
            builder.push(record);
        }
        builder.build()
    }

    /// Number of user rows.
    pub fn users(&self) -> usize {
        self.inner.rows()
    }

    /// Number of item columns.
    pub fn items(&self) -> usize {
        self.inner.cols()
    }

    /// `(users, items)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.users(), self.items())
    }

    /// Number of stored (non-absent) cells.
    pub fn nnz(&self) -> usize {
        self.inner.nnz()
    }

    pub fn is_empty(&self) -> bool {
        self.nnz() == 0
    }

    /// Weight at `(user, item)`; 0 when absent or out of range.
    pub fn get(&self, user_id: usize, item_id: usize) -> f64 {
        if user_id >= self.users() || item_id >= self.items() {
            return 0.0;
        }
        self.inner.get(user_id, item_id).copied().unwrap_or(0.0)
    }

    /// Stored `(item_id, weight)` pairs of one user, ascending by item id.
    ///
    /// Out-of-range users have an empty row.
    pub fn row(&self, user_id: usize) -> Vec<(usize, f64)> {
        self.inner
            .outer_view(user_id)
            .map(|view| view.iter().map(|(item, &w)| (item, w)).collect())
            .unwrap_or_default()
    }

    /// One user's row expanded to `items()` columns.
    pub fn dense_row(&self, user_id: usize) -> Vec<f64> {
        let mut dense = vec![0.0; self.items()];
        for (item, weight) in self.row(user_id) {
            dense[item] = weight;
        }
        dense
    }

    /// All stored cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = InteractionRecord> + '_ {
        self.inner
            .iter()
            .map(|(&w, (user, item))| InteractionRecord::new(user, item, w))
    }
}

/// Accumulates records and produces an [`InteractionMatrix`].
#[derive(Debug, Default)]
pub struct InteractionMatrixBuilder {
    cells: BTreeMap<(usize, usize), f64>,
    users: usize,
    items: usize,
    pushed: usize,
}

impl InteractionMatrixBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. A repeated `(user, item)` adds to the existing weight.
    pub fn push(&mut self, record: InteractionRecord) {
        *self
            .cells
            .entry((record.user_id, record.item_id))
            .or_insert(0.0) += record.weight;
        self.users = self.users.max(record.user_id.saturating_add(1));
        self.items = self.items.max(record.item_id.saturating_add(1));
        self.pushed += 1;
    }

    /// Records pushed so far, duplicates included.
    pub fn records(&self) -> usize {
        self.pushed
    }

    pub fn build(self) -> InteractionMatrix {
        let shape = (self.users, self.items);
        if self.cells.is_empty() {
            return InteractionMatrix {
                inner: CsMat::zero(shape),
            };
        }

        let mut triplets = TriMat::with_capacity(shape, self.cells.len());
        for ((user, item), weight) in self.cells {
            triplets.add_triplet(user, item, weight);
        }
        InteractionMatrix {
            inner: triplets.to_csr(),
        }
    }
}

/// Read a tab-separated interaction log with a `userID artistID weight` header.
///
/// Aborts on the first malformed row.
pub fn read_interactions<R: Read>(reader: R) -> DataResult<InteractionMatrix> {
    let mut rdr = tsv::reader(reader, false);
    let [user_idx, item_idx, weight_idx] =
        tsv::column_indices(&mut rdr, [USER_COLUMN, ITEM_COLUMN, WEIGHT_COLUMN])?;

    let mut builder = InteractionMatrixBuilder::new();
    for (i, result) in rdr.byte_records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| DataError::MalformedRecord {
            row,
            reason: e.to_string(),
        })?;
        let user = tsv::field(&record, user_idx, USER_COLUMN, row)?;
        let item = tsv::field(&record, item_idx, ITEM_COLUMN, row)?;
        let weight = tsv::field(&record, weight_idx, WEIGHT_COLUMN, row)?;
        builder.push(InteractionRecord::parse(row, &user, &item, &weight)?);
    }

    debug!(records = builder.records(), "parsed interaction rows");
    Ok(builder.build())
}

/// Load the interaction log at `path`.
pub fn load_interactions(path: &Path) -> DataResult<InteractionMatrix> {
    let start = Instant::now();
    let file = tsv::open(path)?;
    let matrix = read_interactions(file)?;
    info!(
        path = %path.display(),
        users = matrix.users(),
        items = matrix.items(),
        nnz = matrix.nnz(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "loaded interaction matrix"
    );
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(user: usize, item: usize, weight: f64) -> InteractionRecord {
        InteractionRecord::new(user, item, weight)
    }

    #[test]
    fn shape_follows_max_ids() {
        let m = InteractionMatrix::from_records([rec(2, 7, 1.0), rec(0, 3, 2.0)]);
        assert_eq!(m.shape(), (3, 8));
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(2, 7), 1.0);
        assert_eq!(m.get(0, 3), 2.0);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn every_record_is_retrievable() {
        let records = vec![rec(0, 0, 5.0), rec(0, 1, 3.0), rec(1, 0, 2.0), rec(4, 9, 0.5)];
        let m = InteractionMatrix::from_records(records.clone());
        for r in &records {
            assert_eq!(m.get(r.user_id, r.item_id), r.weight);
        }
        let stored: Vec<_> = m.iter().collect();
        assert_eq!(stored.len(), records.len());
    }

    #[test]
    fn iter_walks_cells_row_major() {
        let m = InteractionMatrix::from_records([rec(1, 0, 2.0), rec(0, 1, 3.0), rec(0, 0, 5.0)]);
        let cells: Vec<_> = m.iter().collect();
        assert_eq!(cells, vec![rec(0, 0, 5.0), rec(0, 1, 3.0), rec(1, 0, 2.0)]);
    }

    #[test]
    fn empty_input_builds_zero_by_zero() {
        let m = InteractionMatrix::from_records(Vec::new());
        assert_eq!(m.shape(), (0, 0));
        assert_eq!(m.nnz(), 0);
        assert!(m.is_empty());
        assert!(m.row(0).is_empty());
        assert!(m.dense_row(0).is_empty());
    }

    #[test]
    fn duplicates_are_summed() {
        let m = InteractionMatrix::from_records([rec(1, 2, 3.0), rec(1, 2, 4.0)]);
        assert_eq!(m.get(1, 2), 7.0);
        assert_eq!(m.nnz(), 1);
    }

    #[test]
    fn rows_slice_and_densify() {
        let m = InteractionMatrix::from_records([rec(0, 0, 5.0), rec(0, 1, 3.0), rec(1, 0, 2.0)]);
        assert_eq!(m.row(0), vec![(0, 5.0), (1, 3.0)]);
        assert_eq!(m.dense_row(0), vec![5.0, 3.0]);
        assert_eq!(m.dense_row(1), vec![2.0, 0.0]);
        assert!(m.row(5).is_empty());
    }

    #[test]
    fn parse_rejects_bad_fields() {
        for (user, item, weight) in [("x", "1", "1"), ("-1", "1", "1"), ("1", "1", "abc"), ("1", "1", "-2"), ("1", "1", "NaN")] {
            let err = InteractionRecord::parse(3, user, item, weight).unwrap_err();
            assert!(matches!(err, DataError::MalformedRecord { row: 3, .. }));
        }
        let ok = InteractionRecord::parse(1, " 2 ", "51", "13883").unwrap();
        assert_eq!(ok, rec(2, 51, 13883.0));
    }

    #[test]
    fn parse_rejects_out_of_range_ids() {
        let huge = usize::MAX.to_string();
        for (user, item) in [(huge.as_str(), "0"), ("0", huge.as_str())] {
            let err = InteractionRecord::parse(4, user, item, "1").unwrap_err();
            match err {
                DataError::MalformedRecord { row, reason } => {
                    assert_eq!(row, 4);
                    assert!(reason.contains("out of range"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
        let over = (MAX_ID + 1).to_string();
        assert!(InteractionRecord::parse(1, &over, "0", "1").is_err());
        assert!(InteractionRecord::parse(1, &MAX_ID.to_string(), "0", "1").is_ok());
    }

    #[test]
    fn max_usize_id_in_log_is_malformed() {
        let data = format!("userID\tartistID\tweight\n{}\t0\t1\n", usize::MAX);
        let err = read_interactions(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 1, .. }));
    }

    #[test]
    fn push_saturates_extent_at_max_id() {
        let mut builder = InteractionMatrixBuilder::new();
        builder.push(InteractionRecord::new(usize::MAX, 0, 1.0));
        assert_eq!(builder.records(), 1);
    }

    #[test]
    fn reads_tsv_log() {
        let data = "userID\tartistID\tweight\n2\t51\t13883\n2\t52\t11690\n3\t51\t100\n";
        let m = read_interactions(data.as_bytes()).unwrap();
        assert_eq!(m.shape(), (4, 53));
        assert_eq!(m.get(2, 52), 11690.0);
        assert_eq!(m.get(3, 51), 100.0);
    }

    #[test]
    fn header_only_log_is_empty() {
        let m = read_interactions("userID\tartistID\tweight\n".as_bytes()).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }

    #[test]
    fn malformed_weight_names_row() {
        let data = "userID\tartistID\tweight\n0\t0\t5\n0\t1\tabc\n";
        let err = read_interactions(data.as_bytes()).unwrap_err();
        match err {
            DataError::MalformedRecord { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("abc"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_row_is_malformed() {
        let data = "userID\tartistID\tweight\n0\t0\n";
        let err = read_interactions(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MalformedRecord { row: 1, .. }));
    }

    #[test]
    fn missing_weight_column() {
        let err = read_interactions("userID\tartistID\n1\t2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn { ref column } if column == "weight"));
    }
}
