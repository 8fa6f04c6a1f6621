//! Companion sequence caches
//!
//! Description, coordinate and probe caches are straight projections of
//! their source tables with audit columns appended.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::bcp::{nullable, BcpRecord};
use crate::core::keys::SequenceKey;
use crate::core::source::{CacheSourceRow, CoordinateRow, DescriptionRow, ProbeRow};

/// Created-by/modified-by user and creation/modification date columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub user_key: i64,
    pub load_date: String,
}

impl AuditStamp {
    pub fn new(user_key: i64, load_date: impl Into<String>) -> Self {
        Self {
            user_key,
            load_date: load_date.into(),
        }
    }

    fn append_to(&self, fields: &mut Vec<String>) {
        let user = self.user_key.to_string();
        fields.push(user.clone());
        fields.push(user);
        fields.push(self.load_date.clone());
        fields.push(self.load_date.clone());
    }
}

// =========================================================================
// SEQ_Description_Cache
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionCacheRow {
    pub sequence_key: SequenceKey,
    pub description: String,
    pub stamp: AuditStamp,
}

impl BcpRecord for DescriptionCacheRow {
    fn fields(&self) -> Vec<String> {
        let mut fields = vec![self.sequence_key.to_string(), self.description.clone()];
        self.stamp.append_to(&mut fields);
        fields
    }
}

/// One row per cached sequence that has a description, by sequence key
pub fn description_rows(
    cache_rows: &[CacheSourceRow],
    descriptions: &[DescriptionRow],
    stamp: &AuditStamp,
) -> Vec<DescriptionCacheRow> {
    let cached: BTreeSet<SequenceKey> = cache_rows.iter().map(|r| r.sequence_key).collect();

    let mut by_sequence: BTreeMap<SequenceKey, &str> = BTreeMap::new();
    for row in descriptions {
        if let Some(description) = row.description.as_deref() {
            if cached.contains(&row.sequence_key) {
                by_sequence.entry(row.sequence_key).or_insert(description);
            }
        }
    }

    by_sequence
        .into_iter()
        .map(|(sequence_key, description)| DescriptionCacheRow {
            sequence_key,
            description: description.to_string(),
            stamp: stamp.clone(),
        })
        .collect()
}

// =========================================================================
// SEQ_Coord_Cache
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateCacheRow {
    pub coordinate: CoordinateRow,
    pub stamp: AuditStamp,
}

impl BcpRecord for CoordinateCacheRow {
    fn fields(&self) -> Vec<String> {
        let c = &self.coordinate;
        let mut fields = vec![
            c.map_key.to_string(),
            c.object_key.to_string(),
            c.chromosome.clone(),
            c.start_coordinate.to_string(),
            c.end_coordinate.to_string(),
            nullable(c.strand.as_deref()),
            c.map_units.clone(),
            c.provider.clone(),
            nullable(c.version.as_deref()),
        ];
        self.stamp.append_to(&mut fields);
        fields
    }
}

/// Distinct coordinate features in (map, object) order
pub fn coordinate_rows(coordinates: &[CoordinateRow], stamp: &AuditStamp) -> Vec<CoordinateCacheRow> {
    let mut rows: Vec<&CoordinateRow> = coordinates.iter().collect();
    rows.sort_by(|a, b| {
        (a.map_key, a.object_key)
            .cmp(&(b.map_key, b.object_key))
            .then(a.start_coordinate.total_cmp(&b.start_coordinate))
            .then(a.end_coordinate.total_cmp(&b.end_coordinate))
    });
    rows.dedup();

    rows.into_iter()
        .map(|coordinate| CoordinateCacheRow {
            coordinate: coordinate.clone(),
            stamp: stamp.clone(),
        })
        .collect()
}

// =========================================================================
// SEQ_Probe_Cache
// =========================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCacheRow {
    pub probe: ProbeRow,
    pub stamp: AuditStamp,
}

impl BcpRecord for ProbeCacheRow {
    fn fields(&self) -> Vec<String> {
        let p = &self.probe;
        let mut fields = vec![
            p.sequence_key.to_string(),
            p.probe_key.to_string(),
            p.refs_key.to_string(),
            p.mdate.clone(),
        ];
        self.stamp.append_to(&mut fields);
        fields
    }
}

/// Distinct (sequence, probe, reference, date) rows
pub fn probe_rows(probes: &[ProbeRow], stamp: &AuditStamp) -> Vec<ProbeCacheRow> {
    let distinct: BTreeSet<&ProbeRow> = probes.iter().collect();
    distinct
        .into_iter()
        .map(|probe| ProbeCacheRow {
            probe: probe.clone(),
            stamp: stamp.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> AuditStamp {
        AuditStamp::new(1000, "05/06/2025")
    }

    fn cached(sequence_key: i64) -> CacheSourceRow {
        CacheSourceRow {
            sequence_key,
            marker_key: 1,
            organism_key: 1,
            marker_type_key: 1,
            provider_key: 316372,
            sequence_type_key: 316346,
            logical_db_key: 27,
            refs_key: 1,
            user_key: None,
            mdate: "01/01/2020".to_string(),
            acc_id: "NM_1".to_string(),
        }
    }

    #[test]
    fn test_descriptions_limited_to_cached_sequences() {
        let rows = description_rows(
            &[cached(2), cached(1), cached(2)],
            &[
                DescriptionRow { sequence_key: 1, description: Some("Mus musculus Pax6".to_string()) },
                DescriptionRow { sequence_key: 2, description: None },
                DescriptionRow { sequence_key: 3, description: Some("unrelated".to_string()) },
            ],
            &stamp(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].fields().join("|"),
            "1|Mus musculus Pax6|1000|1000|05/06/2025|05/06/2025"
        );
    }

    #[test]
    fn test_coordinate_fields_with_nulls() {
        let rows = coordinate_rows(
            &[CoordinateRow {
                map_key: 5,
                object_key: 50,
                chromosome: "11".to_string(),
                start_coordinate: 105_505_001.0,
                end_coordinate: 105_505_500.0,
                strand: None,
                map_units: "bp".to_string(),
                provider: "NCBI Gene Model".to_string(),
                version: Some("GRCm39".to_string()),
            }],
            &stamp(),
        );
        assert_eq!(
            rows[0].fields().join("|"),
            "5|50|11|105505001|105505500||bp|NCBI Gene Model|GRCm39|1000|1000|05/06/2025|05/06/2025"
        );
    }

    #[test]
    fn test_probes_are_distinct_and_ordered() {
        let probe = |s, p| ProbeRow {
            sequence_key: s,
            probe_key: p,
            refs_key: 9,
            mdate: "02/02/2002".to_string(),
        };
        let rows = probe_rows(&[probe(2, 20), probe(1, 10), probe(2, 20)], &stamp());
        let keys: Vec<i64> = rows.iter().map(|r| r.probe.sequence_key).collect();
        assert_eq!(keys, vec![1, 2]);
    }
}
