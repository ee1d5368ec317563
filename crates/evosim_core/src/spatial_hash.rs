use evosim_data::{Creature, CreatureId, CreatureKind, Plant, PlantId};

/// Bucket selector for grid queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Plant,
    Herbivore,
    Carnivore,
}

impl EntityKind {
    const COUNT: usize = 3;

    #[inline]
    fn slot(self) -> usize {
        match self {
            EntityKind::Plant => 0,
            EntityKind::Herbivore => 1,
            EntityKind::Carnivore => 2,
        }
    }
}

impl From<CreatureKind> for EntityKind {
    fn from(kind: CreatureKind) -> Self {
        match kind {
            CreatureKind::Herbivore => EntityKind::Herbivore,
            CreatureKind::Carnivore => EntityKind::Carnivore,
        }
    }
}

/// An entry in the grid. Agents carry their index into the creature
/// collection the grid was built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridEntity {
    Plant {
        id: PlantId,
        x: f64,
        y: f64,
    },
    Agent {
        index: usize,
        id: CreatureId,
        x: f64,
        y: f64,
        kind: CreatureKind,
    },
}

impl GridEntity {
    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        match *self {
            GridEntity::Plant { x, y, .. } | GridEntity::Agent { x, y, .. } => (x, y),
        }
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            GridEntity::Plant { .. } => EntityKind::Plant,
            GridEntity::Agent { kind, .. } => (*kind).into(),
        }
    }
}

/// Wraps a coordinate into `[0, size)`.
#[inline]
#[must_use]
pub fn wrap_coordinate(value: f64, size: f64) -> f64 {
    let wrapped = value.rem_euclid(size);
    // rem_euclid can round up to `size` for tiny negative inputs.
    if wrapped >= size {
        0.0
    } else {
        wrapped
    }
}

/// Shortest signed displacement from `from` to `to` on a ring of length `size`.
#[inline]
#[must_use]
pub fn toroidal_delta(from: f64, to: f64, size: f64) -> f64 {
    let mut d = to - from;
    let half = size * 0.5;
    if d > half {
        d -= size;
    } else if d < -half {
        d += size;
    }
    d
}

/// Toroidal bucket grid over the world, rebuilt every tick.
///
/// Each cell holds one bucket per [`EntityKind`]. The grid is a derived
/// index: creature and plant collections remain authoritative.
///
/// # Cell mapping
/// - `cols = ceil(width / cell_size)`, `rows = ceil(height / cell_size)`
/// - a point lands in `(floor(x / cell_size) mod cols, floor(y / cell_size) mod rows)`
/// - non-finite coordinates are never stored and query as empty
///
/// With the cell size equal to the sensing range, the 3×3 neighborhood of a
/// point covers its whole sensing radius.
///
/// # Examples
/// ```
/// use evosim_core::spatial_hash::{EntityKind, GridEntity, SpatialHash};
/// use evosim_data::PlantId;
///
/// let mut grid = SpatialHash::new(50.0, 100.0, 100.0);
/// grid.insert(GridEntity::Plant { id: PlantId(0), x: 10.0, y: 10.0 });
///
/// assert_eq!(grid.query_local_cell(10.0, 10.0, EntityKind::Plant).len(), 1);
/// assert!(grid.query_local_cell(60.0, 60.0, EntityKind::Plant).is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct SpatialHash {
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    buckets: Vec<[Vec<GridEntity>; EntityKind::COUNT]>,
    len: usize,
}

impl SpatialHash {
    /// Creates an empty grid. Degenerate sizes fall back to a single cell.
    #[must_use]
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            width.max(height).max(1.0)
        };
        let cols = cell_count(width, cell_size);
        let rows = cell_count(height, cell_size);
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            buckets: vec![Default::default(); cols * rows],
            len: 0,
        }
    }

    /// Discards every entry, keeping bucket allocations.
    pub fn clear(&mut self) {
        for cell in &mut self.buckets {
            for bucket in cell.iter_mut() {
                bucket.clear();
            }
        }
        self.len = 0;
    }

    /// Clears the grid and inserts every living creature and every plant.
    pub fn rebuild(&mut self, creatures: &[Creature], plants: &[Plant]) {
        self.clear();
        for (index, c) in creatures.iter().enumerate().filter(|(_, c)| c.alive) {
            self.insert(GridEntity::Agent {
                index,
                id: c.id,
                x: c.x,
                y: c.y,
                kind: c.kind(),
            });
        }
        for plant in plants {
            self.insert(GridEntity::Plant {
                id: plant.id,
                x: plant.x,
                y: plant.y,
            });
        }
    }

    /// Cell `(col, row)` containing the point, wrapping toroidally.
    #[inline]
    #[must_use]
    pub fn cell_coords(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let col = ((x / self.cell_size).floor() as i64).rem_euclid(self.cols as i64) as usize;
        let row = ((y / self.cell_size).floor() as i64).rem_euclid(self.rows as i64) as usize;
        Some((col, row))
    }

    /// Adds an entity to its cell's bucket. Returns `false` for
    /// non-finite positions.
    pub fn insert(&mut self, entity: GridEntity) -> bool {
        let (x, y) = entity.position();
        let Some((col, row)) = self.cell_coords(x, y) else {
            return false;
        };
        let cell = row * self.cols + col;
        self.buckets[cell][entity.kind().slot()].push(entity);
        self.len += 1;
        true
    }

    /// Entities of `kind` in the single cell containing the point.
    #[must_use]
    pub fn query_local_cell(&self, x: f64, y: f64, kind: EntityKind) -> &[GridEntity] {
        match self.cell_coords(x, y) {
            Some((col, row)) => &self.buckets[row * self.cols + col][kind.slot()],
            None => &[],
        }
    }

    /// Entities of `kind` in the 3×3 block of cells around the point.
    #[must_use]
    pub fn query_neighborhood(&self, x: f64, y: f64, kind: EntityKind) -> Vec<GridEntity> {
        let mut out = Vec::new();
        self.query_neighborhood_into(x, y, kind, &mut out);
        out
    }

    /// Like [`Self::query_neighborhood`], appending into `out`.
    pub fn query_neighborhood_into(
        &self,
        x: f64,
        y: f64,
        kind: EntityKind,
        out: &mut Vec<GridEntity>,
    ) {
        self.for_each_in_neighborhood(x, y, kind, |e| out.push(*e));
    }

    /// Visits entities of `kind` in the 3×3 block without allocating.
    /// Grids narrower than three cells visit each distinct cell once.
    pub fn for_each_in_neighborhood<F>(&self, x: f64, y: f64, kind: EntityKind, mut f: F)
    where
        F: FnMut(&GridEntity),
    {
        let Some((col, row)) = self.cell_coords(x, y) else {
            return;
        };
        let mut visited = [usize::MAX; 9];
        let mut count = 0;
        for dy in [-1i64, 0, 1] {
            for dx in [-1i64, 0, 1] {
                let c = (col as i64 + dx).rem_euclid(self.cols as i64) as usize;
                let r = (row as i64 + dy).rem_euclid(self.rows as i64) as usize;
                let cell = r * self.cols + c;
                if visited[..count].contains(&cell) {
                    continue;
                }
                visited[count] = cell;
                count += 1;
                for entity in &self.buckets[cell][kind.slot()] {
                    f(entity);
                }
            }
        }
    }

    /// Total number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

fn cell_count(size: f64, cell_size: f64) -> usize {
    if size.is_finite() && size > 0.0 {
        ((size / cell_size).ceil() as usize).max(1)
    } else {
        1
    }
}
