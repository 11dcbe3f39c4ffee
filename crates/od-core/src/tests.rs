//! Unit tests for od-core primitives.

use std::sync::Arc;

use crate::{SparseZoneIndex, Zone, ZoneNumber, ZoneSystem};

fn index(zones: &[u32]) -> Arc<SparseZoneIndex> {
    Arc::new(SparseZoneIndex::new(zones.iter().map(|&z| ZoneNumber(z))).unwrap())
}

#[cfg(test)]
mod sparse_index {
    use super::*;
    use crate::OdError;

    #[test]
    fn index_roundtrip() {
        let idx = index(&[9000, 101, 4021, 205, 102]);
        for &z in &[101, 102, 205, 4021, 9000] {
            let flat = idx.index_of(ZoneNumber(z)).unwrap();
            assert_eq!(idx.key_at(flat), ZoneNumber(z));
        }
    }

    #[test]
    fn keys_are_sorted() {
        let idx = index(&[30, 10, 20]);
        assert_eq!(idx.keys(), &[ZoneNumber(10), ZoneNumber(20), ZoneNumber(30)]);
        assert_eq!(idx.index_of(ZoneNumber(20)).unwrap(), 1);
    }

    #[test]
    fn unknown_zone_is_an_error() {
        let idx = index(&[1, 2, 3]);
        match idx.index_of(ZoneNumber(4)) {
            Err(OdError::InvalidZone(z)) => assert_eq!(z, ZoneNumber(4)),
            other => panic!("expected InvalidZone, got {other:?}"),
        }
        assert!(idx.try_index_of(ZoneNumber(0)).is_none());
        assert!(!idx.contains(ZoneNumber(99)));
    }

    #[test]
    fn duplicate_zone_rejected() {
        let err = SparseZoneIndex::new([ZoneNumber(5), ZoneNumber(1), ZoneNumber(5)]).unwrap_err();
        assert!(matches!(err, OdError::DuplicateZone(ref z) if z == "5"));
    }

    #[test]
    fn create_arrays_are_zeroed() {
        let idx = index(&[1, 2, 3]);
        let m = idx.create_matrix::<f32>();
        assert_eq!((m.rows(), m.cols()), (3, 3));
        assert!(m.as_slice().iter().all(|&v| v == 0.0));
        let v = idx.create_vector::<f32>();
        assert_eq!(v.len(), 3);
        assert!(m.is_square());
    }
}

#[cfg(test)]
mod matrix {
    use super::*;
    use crate::{Matrix, OdError, OdRecord, Vector};

    #[test]
    fn get_set_by_zone_number() {
        let idx = index(&[10, 20, 30]);
        let mut m = idx.create_matrix::<f32>();
        m.set(ZoneNumber(20), ZoneNumber(30), 4.5).unwrap();
        assert_eq!(*m.get(ZoneNumber(20), ZoneNumber(30)).unwrap(), 4.5);
        assert_eq!(*m.at(1, 2), 4.5);
        assert!(m.set(ZoneNumber(25), ZoneNumber(30), 1.0).is_err());
    }

    #[test]
    fn from_flat_checks_length() {
        let idx = index(&[1, 2]);
        let err = Matrix::from_flat(idx.clone(), idx.clone(), vec![1.0f32; 3]).unwrap_err();
        assert!(matches!(err, OdError::DimensionMismatch { expected: 4, got: 3, .. }));
        assert!(Matrix::from_flat(idx.clone(), idx, vec![1.0f32; 4]).is_ok());
    }

    #[test]
    fn rectangular_shape() {
        let rows = index(&[1, 2]);
        let cols = index(&[7, 8, 9]);
        let m = Matrix::<f32>::zeros(rows, cols);
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert!(!m.is_square());
    }

    #[test]
    fn from_records_loads_and_rejects_unknown_zones() {
        let idx = index(&[1, 2, 3]);
        let records = vec![
            OdRecord { origin: ZoneNumber(1), destination: ZoneNumber(2), value: 3.0 },
            OdRecord { origin: ZoneNumber(3), destination: ZoneNumber(3), value: 1.5 },
        ];
        let m = Matrix::from_records(idx.clone(), idx.clone(), records).unwrap();
        assert_eq!(*m.at(0, 1), 3.0);
        assert_eq!(*m.at(2, 2), 1.5);
        assert_eq!(m.total(), 4.5);

        let bad = vec![(ZoneNumber(1), ZoneNumber(4), 1.0f32)];
        let err = Matrix::from_records(idx.clone(), idx, bad).unwrap_err();
        assert!(matches!(err, OdError::InvalidZone(ZoneNumber(4))));
    }

    #[test]
    fn row_and_column_sums() {
        let idx = index(&[1, 2, 3]);
        let m = Matrix::from_flat(
            idx.clone(),
            idx,
            vec![1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )
        .unwrap();
        assert_eq!(m.row_sums(), vec![6.0, 15.0, 24.0]);
        assert_eq!(m.column_sums(), vec![12.0, 15.0, 18.0]);
    }

    #[test]
    fn from_fn_uses_zone_numbers() {
        let idx = index(&[1, 5]);
        let m = Matrix::from_fn(idx.clone(), idx, |o, d| (o.get() * 10 + d.get()) as f32);
        assert_eq!(m.as_slice(), &[11.0, 15.0, 51.0, 55.0]);
    }

    #[test]
    fn vector_length_checked() {
        let idx = index(&[1, 2, 3]);
        assert!(Vector::from_flat(idx.clone(), vec![1.0f32, 2.0]).is_err());
        let v = Vector::from_flat(idx, vec![1.0f32, 2.0, 3.0]).unwrap();
        assert_eq!(v.total(), 6.0);
        assert_eq!(*v.get(ZoneNumber(2)).unwrap(), 2.0);
    }
}

#[cfg(test)]
mod zones {
    use super::*;
    use crate::{PlanningDistrict, RegionNumber};

    fn system() -> ZoneSystem {
        ZoneSystem::new(vec![
            Zone::new(30, 2, 1),
            Zone::new(10, 1, 1),
            Zone::new(20, 1, 1),
            Zone::new(40, 7, 2),
        ])
        .unwrap()
    }

    #[test]
    fn zones_in_flat_order() {
        let zs = system();
        let numbers: Vec<u32> = zs.zones().iter().map(|z| z.number.get()).collect();
        assert_eq!(numbers, vec![10, 20, 30, 40]);
        assert_eq!(zs.zone(ZoneNumber(30)).unwrap().planning_district, PlanningDistrict(2));
    }

    #[test]
    fn planning_district_index() {
        let pd = system().planning_district_index();
        assert_eq!(pd.group_count(), 3);
        assert_eq!(pd.groups().keys(), &[PlanningDistrict(1), PlanningDistrict(2), PlanningDistrict(7)]);
        assert_eq!(pd.group_of(0), 0);
        assert_eq!(pd.group_of(1), 0);
        assert_eq!(pd.group_of(2), 1);
        assert_eq!(pd.group_of(3), 2);
        assert_eq!(pd.members(0), &[0, 1]);
        assert_eq!(pd.aggregate(&[1.0, 2.0, 3.0, 4.0]).unwrap(), vec![3.0, 3.0, 4.0]);
    }

    #[test]
    fn aggregate_rejects_wrong_length() {
        let pd = system().planning_district_index();
        assert!(matches!(
            pd.aggregate(&[1.0, 2.0]),
            Err(crate::OdError::DimensionMismatch { what: "aggregated values", expected: 4, got: 2 })
        ));
    }

    #[test]
    fn region_index() {
        let regions = system().region_index();
        assert_eq!(regions.group_count(), 2);
        assert_eq!(regions.groups().index_of(RegionNumber(2)).unwrap(), 1);
        assert_eq!(regions.members(0), &[0, 1, 2]);
    }

    #[test]
    fn duplicate_zone_number_rejected() {
        assert!(ZoneSystem::new(vec![Zone::new(1, 1, 1), Zone::new(1, 2, 1)]).is_err());
    }
}

#[cfg(test)]
mod numeric {
    use crate::numeric::{finite_or_zero, safe_ratio, sum};

    #[test]
    fn guards() {
        assert_eq!(safe_ratio(1.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
        assert_eq!(finite_or_zero(f32::NAN), 0.0);
        assert_eq!(finite_or_zero(f32::NEG_INFINITY), 0.0);
        assert_eq!(sum(&[0.5, 0.25, 0.25]), 1.0);
    }
}

#[cfg(test)]
mod rng {
    use crate::StreamRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = StreamRng::new(12345, 7);
        let mut r2 = StreamRng::new(12345, 7);
        for _ in 0..100 {
            assert_eq!(r1.unit(), r2.unit());
        }
    }

    #[test]
    fn different_streams_differ() {
        let mut r0 = StreamRng::new(1, 0);
        let mut r1 = StreamRng::new(1, 1);
        assert_ne!(r0.unit(), r1.unit(), "adjacent streams should diverge");
    }

    #[test]
    fn unit_in_bounds() {
        let mut rng = StreamRng::new(0, 0);
        for _ in 0..1000 {
            let v = rng.unit();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
