use std::collections::{BTreeMap, VecDeque};

use crate::{AssemblyConfig, CoordinateSystem, Point, Trajectory};

/// Builds trajectories incrementally from a stream of points sorted by time, holding only the
/// current run for each object. Produces the same trajectories as `assemble`, but in the order
/// they finish.
pub struct Assembler<C: CoordinateSystem> {
    config: AssemblyConfig,
    in_progress: BTreeMap<String, Vec<Point<C>>>,
}

impl<C: CoordinateSystem> Assembler<C> {
    pub fn new(config: AssemblyConfig) -> Self {
        Self {
            config,
            in_progress: BTreeMap::new(),
        }
    }

    /// If this point starts a new run for its object, returns the finished previous run (as long
    /// as it's long enough).
    pub fn push(&mut self, pt: Point<C>) -> Option<Trajectory<C>> {
        let run = self
            .in_progress
            .entry(pt.object_id.clone())
            .or_insert_with(Vec::new);
        let mut finished = None;
        if let Some(last) = run.last() {
            if self.config.is_apart(last, &pt) {
                finished = close_run(std::mem::take(run), self.config.minimum_length);
            }
        }
        run.push(pt);
        finished
    }

    /// How many objects have a run in progress
    pub fn num_in_progress(&self) -> usize {
        self.in_progress.len()
    }

    /// Closes every run still in progress, ordered by object ID.
    pub fn finish(self) -> Vec<Trajectory<C>> {
        let minimum_length = self.config.minimum_length;
        self.in_progress
            .into_values()
            .filter_map(|run| close_run(run, minimum_length))
            .collect()
    }
}

fn close_run<C: CoordinateSystem>(
    run: Vec<Point<C>>,
    minimum_length: usize,
) -> Option<Trajectory<C>> {
    if run.len() < minimum_length {
        if let Some(pt) = run.first() {
            debug!(
                "Dropping run of {} point(s) for {:?} starting at {}",
                run.len(),
                pt.object_id,
                pt.timestamp
            );
        }
        return None;
    }
    Some(Trajectory::from_points(run))
}

/// Lazily assembles trajectories from any iterator of time-sorted points.
pub struct AssembleIter<C: CoordinateSystem, I: Iterator<Item = Point<C>>> {
    points: I,
    // None once the input is exhausted and everything has been flushed into `pending`
    assembler: Option<Assembler<C>>,
    pending: VecDeque<Trajectory<C>>,
}

impl<C: CoordinateSystem, I: Iterator<Item = Point<C>>> AssembleIter<C, I> {
    pub fn new<P: IntoIterator<IntoIter = I>>(points: P, config: AssemblyConfig) -> Self {
        Self {
            points: points.into_iter(),
            assembler: Some(Assembler::new(config)),
            pending: VecDeque::new(),
        }
    }
}

impl<C: CoordinateSystem, I: Iterator<Item = Point<C>>> Iterator for AssembleIter<C, I> {
    type Item = Trajectory<C>;

    fn next(&mut self) -> Option<Trajectory<C>> {
        loop {
            if let Some(traj) = self.pending.pop_front() {
                return Some(traj);
            }
            let assembler = self.assembler.as_mut()?;
            match self.points.next() {
                Some(pt) => {
                    if let Some(traj) = assembler.push(pt) {
                        return Some(traj);
                    }
                }
                None => {
                    if let Some(assembler) = self.assembler.take() {
                        self.pending.extend(assembler.finish());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::test_util::ts;
    use crate::{assemble, Cartesian2D};

    fn stream() -> Vec<Point<Cartesian2D>> {
        let t0 = ts("2014-01-01 00:00:00");
        // (object, minute)
        let raw = [
            ("a", 0),
            ("b", 1),
            ("a", 2),
            ("b", 3),
            ("a", 4),
            ("b", 50),
            ("a", 60),
            ("b", 51),
            ("a", 61),
            ("c", 62),
        ];
        let mut points: Vec<Point<Cartesian2D>> = raw
            .into_iter()
            .map(|(id, minute)| {
                Point::new([minute as f64, 0.0])
                    .with_object_id(id)
                    .with_timestamp(t0 + Duration::minutes(minute))
            })
            .collect();
        points.sort_by_key(|pt| pt.timestamp);
        points
    }

    #[test]
    fn push_reports_finished_runs() {
        let mut assembler = Assembler::new(AssemblyConfig::default());
        let mut finished = Vec::new();
        for pt in stream() {
            finished.extend(assembler.push(pt));
        }
        // b's first run closes at minute 50, a's at minute 60
        assert_eq!(finished.len(), 2);
        assert_eq!(finished[0].object_id(), "b");
        assert_eq!(finished[0].len(), 2);
        assert_eq!(finished[1].object_id(), "a");
        assert_eq!(finished[1].len(), 3);
        assert_eq!(assembler.num_in_progress(), 3);

        // c only has one point
        let rest = assembler.finish();
        let ids: Vec<&str> = rest.iter().map(|t| t.object_id()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn iterator_matches_batch() {
        let config = AssemblyConfig::default();
        let mut lazy: Vec<Trajectory<Cartesian2D>> =
            AssembleIter::new(stream(), config.clone()).collect();
        let batch = assemble(stream(), &config);
        assert_eq!(lazy.len(), batch.len());
        lazy.sort_by(|a, b| a.trajectory_id().cmp(&b.trajectory_id()));
        assert_eq!(lazy, batch);
    }

    #[test]
    fn empty_stream() {
        let mut iter = AssembleIter::new(Vec::<Point<Cartesian2D>>::new(), AssemblyConfig::default());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
