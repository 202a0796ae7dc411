use std::collections::HashMap;

use eframe::egui::Pos2;

pub const DEFAULT_CELL_SIZE: f32 = 50.0;

// cell_size must be at least twice the largest hit radius.
#[derive(Clone, Debug)]
pub struct SpatialIndex<T> {
    cell_size: f32,
    buckets: HashMap<(i32, i32), Vec<T>>,
    len: usize,
}

impl<T> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl<T> SpatialIndex<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            buckets: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, position: Pos2) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    pub fn insert(&mut self, position: Pos2, item: T) {
        let key = self.bucket_of(position);
        self.buckets.entry(key).or_default().push(item);
        self.len += 1;
    }

    pub fn query_near(&self, position: Pos2) -> impl Iterator<Item = &T> {
        let (bx, by) = self.bucket_of(position);
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (bx + dx, by + dy)))
            .filter_map(|key| self.buckets.get(&key))
            .flatten()
    }
}
