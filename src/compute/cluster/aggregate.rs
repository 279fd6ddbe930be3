//! Per-group accumulation shared by both clustering strategies.

use geocluster_types::{ClusterSummary, GeoPoint, GeotaggedRecord};
use std::cmp::Ordering;

/// Newest first; ties broken by id so the sample is independent of input order.
fn sample_order(a: &GeotaggedRecord, b: &GeotaggedRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Running state for one cluster.
///
/// Keeps coordinate sums instead of the member list, plus the `limit`
/// newest members for the sample.
#[derive(Debug, Clone)]
pub(crate) struct GroupAccumulator<'a> {
    lat_sum: f64,
    lng_sum: f64,
    count: usize,
    limit: usize,
    samples: Vec<&'a GeotaggedRecord>,
    first: &'a GeotaggedRecord,
}

impl<'a> GroupAccumulator<'a> {
    pub(crate) fn new(first: &'a GeotaggedRecord, limit: usize) -> Self {
        let mut acc = Self {
            lat_sum: 0.0,
            lng_sum: 0.0,
            count: 0,
            limit,
            samples: Vec::with_capacity(limit.min(16)),
            first,
        };
        acc.add(first);
        acc
    }

    pub(crate) fn add(&mut self, record: &'a GeotaggedRecord) {
        let Some(coord) = record.coordinate else {
            return;
        };

        self.lat_sum += coord.latitude;
        self.lng_sum += coord.longitude;
        self.count += 1;
        self.offer_sample(record);
    }

    fn offer_sample(&mut self, record: &'a GeotaggedRecord) {
        let pos = self
            .samples
            .partition_point(|s| sample_order(s, record) == Ordering::Less);
        if pos >= self.limit {
            return;
        }
        self.samples.insert(pos, record);
        self.samples.truncate(self.limit);
    }

    /// Fold another accumulator for the same key into this one.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn merge(&mut self, other: GroupAccumulator<'a>) {
        self.lat_sum += other.lat_sum;
        self.lng_sum += other.lng_sum;
        self.count += other.count;
        for record in other.samples {
            self.offer_sample(record);
        }
    }

    /// Build the summary. With `attach_place`, a single-member group carries
    /// its record's place metadata.
    pub(crate) fn finish(self, attach_place: bool) -> ClusterSummary {
        let n = self.count.max(1) as f64;
        let single = attach_place && self.count == 1;

        ClusterSummary {
            centroid: GeoPoint::new(self.lat_sum / n, self.lng_sum / n),
            member_count: self.count,
            is_cluster: self.count > 1,
            sample_ids: self.samples.iter().map(|r| r.id).collect(),
            place_id: self.first.place_id.filter(|_| single),
            place_name: single
                .then(|| self.first.effective_place_name().map(str::to_owned))
                .flatten(),
            city: single
                .then(|| self.first.effective_city().map(str::to_owned))
                .flatten(),
        }
    }
}
