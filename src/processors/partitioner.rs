use crate::models::SequencedRecord;
use std::collections::BTreeMap;

/// Records grouped by year, each group in input order.
pub type Partitions = BTreeMap<i32, Vec<SequencedRecord>>;

pub struct Partitioner;

impl Partitioner {
    pub fn new() -> Self {
        Self
    }

    /// Group records by year. Within a year, records keep the order they
    /// arrive in, which the reducer's tie-breaking relies on.
    pub fn partition(&self, records: Vec<SequencedRecord>) -> Partitions {
        let mut partitions = Partitions::new();

        for record in records {
            partitions.entry(record.year()).or_default().push(record);
        }

        partitions
    }
}

impl Default for Partitioner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClimateRecord;
    use chrono::NaiveDate;

    fn sequenced(position: usize, year: i32) -> SequencedRecord {
        let timestamp = NaiveDate::from_ymd_opt(year, 6, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        SequencedRecord::new(
            position,
            ClimateRecord::new(timestamp, position as f64, 0.5, 5.0, 10.0, 1010.0),
        )
    }

    #[test]
    fn test_partitions_are_disjoint_and_exhaustive() {
        let input: Vec<SequencedRecord> = [2010, 2012, 2010, 2011, 2012, 2010]
            .iter()
            .enumerate()
            .map(|(position, year)| sequenced(position, *year))
            .collect();

        let partitions = Partitioner::new().partition(input.clone());

        assert_eq!(partitions.keys().copied().collect::<Vec<_>>(), vec![2010, 2011, 2012]);

        let mut positions: Vec<usize> = partitions
            .values()
            .flat_map(|records| records.iter().map(|r| r.position))
            .collect();
        positions.sort_unstable();
        assert_eq!(positions, (0..input.len()).collect::<Vec<_>>());

        for (year, records) in &partitions {
            assert!(records.iter().all(|r| r.year() == *year));
        }
    }

    #[test]
    fn test_order_within_year_is_preserved() {
        let input = vec![sequenced(4, 2010), sequenced(7, 2011), sequenced(9, 2010)];

        let partitions = Partitioner::new().partition(input);
        let positions: Vec<usize> = partitions[&2010].iter().map(|r| r.position).collect();

        assert_eq!(positions, vec![4, 9]);
    }

    #[test]
    fn test_empty_input() {
        assert!(Partitioner::new().partition(Vec::new()).is_empty());
    }
}
