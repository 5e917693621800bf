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

//! Uniform grid partitioning over a collection boundary
//!
//! A record lands in every cell its envelope intersects, so a record can
//! be replicated across cells; join deduplication undoes the replication.
//! Records outside the boundary (possible when a partitioner built on one
//! collection is applied to another) go to a dedicated overflow bucket.
use geobridge_geometry::Envelope;

/// An immutable grid of closed cells covering a boundary envelope
#[derive(Debug, Clone, PartialEq)]
pub struct UniformGrid {
    cells: Vec<Envelope>,
}

impl UniformGrid {
    /// Split `boundary` into roughly `num_partitions` cells
    ///
    /// Cell count is `cols * rows` with `cols = ceil(sqrt(n))`, which can
    /// exceed `n` slightly; exact partition counts are not guaranteed.
    pub fn build(boundary: &Envelope, num_partitions: usize) -> Self {
        let cols = (num_partitions as f64).sqrt().ceil().max(1.0) as usize;
        let rows = num_partitions.div_ceil(cols).max(1);

        let cell_width = boundary.width() / cols as f64;
        let cell_height = boundary.height() / rows as f64;

        let mut cells = Vec::with_capacity(cols * rows);
        for row in 0..rows {
            for col in 0..cols {
                let min_x = boundary.min_x() + col as f64 * cell_width;
                let min_y = boundary.min_y() + row as f64 * cell_height;
                // Direct construction keeps shared edges in both cells;
                // degenerate cells from zero-extent boundaries are fine.
                let cell = Envelope::new(min_x, min_x + cell_width, min_y, min_y + cell_height)
                    .expect("grid cells inherit finite ordered bounds");
                cells.push(cell);
            }
        }
        Self { cells }
    }

    /// Number of buckets including the overflow bucket
    pub fn num_buckets(&self) -> usize {
        self.cells.len() + 1
    }

    /// Bucket index for records that intersect no cell
    pub fn overflow_bucket(&self) -> usize {
        self.cells.len()
    }

    /// Every bucket the envelope belongs to
    ///
    /// A linear scan over the cells; cell counts in this engine are small.
    pub fn buckets_for(&self, envelope: Option<&Envelope>) -> Vec<usize> {
        let Some(envelope) = envelope else {
            return vec![self.overflow_bucket()];
        };
        let hits: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.intersects(envelope))
            .map(|(index, _)| index)
            .collect();
        if hits.is_empty() {
            vec![self.overflow_bucket()]
        } else {
            hits
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Envelope {
        Envelope::new(min_x, max_x, min_y, max_y).unwrap()
    }

    #[test]
    fn four_partitions_make_a_two_by_two_grid() {
        let grid = UniformGrid::build(&env(0.0, 9.0, 0.0, 9.0), 4);
        assert_eq!(grid.num_buckets(), 5);

        // Fully inside the lower-left cell
        assert_eq!(grid.buckets_for(Some(&env(0.0, 4.0, 0.0, 4.0))), vec![0]);
        // Straddles the split at 4.5 on both axes
        assert_eq!(
            grid.buckets_for(Some(&env(2.0, 6.0, 2.0, 6.0))),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn shared_edge_lands_in_both_cells() {
        let grid = UniformGrid::build(&env(0.0, 8.0, 0.0, 8.0), 4);
        assert_eq!(
            grid.buckets_for(Some(&env(4.0, 4.0, 0.0, 1.0))),
            vec![0, 1]
        );
    }

    #[test]
    fn outside_boundary_goes_to_overflow() {
        let grid = UniformGrid::build(&env(0.0, 8.0, 0.0, 8.0), 4);
        assert_eq!(grid.buckets_for(Some(&env(20.0, 21.0, 0.0, 1.0))), vec![4]);
        assert_eq!(grid.buckets_for(None), vec![4]);
    }

    #[test]
    fn single_partition_keeps_everything_together() {
        let grid = UniformGrid::build(&env(0.0, 8.0, 0.0, 8.0), 1);
        assert_eq!(grid.num_buckets(), 2);
        assert_eq!(grid.buckets_for(Some(&env(1.0, 2.0, 1.0, 2.0))), vec![0]);
    }
}
