// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Envelope R-tree over record indices
//!
//! Both requestable index types are served by the same R-tree; the
//! requested type is retained as metadata only, mirroring how the grid
//! types share one partitioning implementation.
use rstar::{PointDistance, RTree, RTreeObject, AABB};

use geobridge_geometry::Envelope;

/// One indexed record: its position in the collection plus its bounds
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeEntry {
    pub record_index: usize,
    pub envelope: Envelope,
}

impl RTreeObject for EnvelopeEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.envelope.min_x(), self.envelope.min_y()],
            [self.envelope.max_x(), self.envelope.max_y()],
        )
    }
}

impl PointDistance for EnvelopeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.envelope.distance_sq_to_point(point[0], point[1])
    }
}

/// Bulk-load an R-tree over the records that have bounds
///
/// Records without an envelope (empty geometries) are skipped; they can
/// never satisfy an envelope-based candidate lookup.
pub fn build_rtree<'a, I>(entries: I) -> RTree<EnvelopeEntry>
where
    I: IntoIterator<Item = (usize, &'a Option<Envelope>)>,
{
    let entries: Vec<EnvelopeEntry> = entries
        .into_iter()
        .filter_map(|(record_index, envelope)| {
            envelope.map(|envelope| EnvelopeEntry {
                record_index,
                envelope,
            })
        })
        .collect();
    RTree::bulk_load(entries)
}

/// Candidate record indices whose bounds intersect the query envelope
pub fn query_candidates(tree: &RTree<EnvelopeEntry>, query: &Envelope) -> Vec<usize> {
    let aabb = AABB::from_corners(
        [query.min_x(), query.min_y()],
        [query.max_x(), query.max_y()],
    );
    tree.locate_in_envelope_intersecting(&aabb)
        .map(|entry| entry.record_index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Option<Envelope> {
        Some(Envelope::new(min_x, max_x, min_y, max_y).unwrap())
    }

    #[test]
    fn candidates_by_envelope() {
        let envelopes = vec![
            env(0.0, 1.0, 0.0, 1.0),
            env(5.0, 6.0, 5.0, 6.0),
            env(0.5, 2.0, 0.5, 2.0),
            None,
        ];
        let tree = build_rtree(envelopes.iter().enumerate());

        let mut hits = query_candidates(&tree, &Envelope::new(0.0, 1.0, 0.0, 1.0).unwrap());
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 2]);

        assert!(query_candidates(&tree, &Envelope::new(10.0, 11.0, 10.0, 11.0).unwrap()).is_empty());
    }

    #[test]
    fn nearest_neighbour_order() {
        let envelopes = vec![
            env(0.0, 1.0, 0.0, 1.0),
            env(4.0, 5.0, 0.0, 1.0),
            env(9.0, 10.0, 0.0, 1.0),
        ];
        let tree = build_rtree(envelopes.iter().enumerate());
        let order: Vec<usize> = tree
            .nearest_neighbor_iter(&[3.0, 0.0])
            .map(|entry| entry.record_index)
            .collect();
        assert_eq!(order, vec![1, 0, 2]);
    }
}
