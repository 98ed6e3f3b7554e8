//! Pieces module - shape matrices and the naive rotation transform
//!
//! Every piece is described by a base occupancy matrix (at most 4x4). Rotating clockwise is a
//! transpose-and-reverse: for an R×C matrix the rotated C×R matrix has
//! `rotated[x][R - 1 - y] = original[y][x]`. Orientation `n` is that transform applied `n`
//! times to the base matrix. There is no kick table: the rotated matrix keeps its top-left
//! corner at the piece position and rotations that collide are rejected.

use arrayvec::ArrayVec;

use crate::types::{PieceKind, Rotation, BOARD_WIDTH};

/// Offset of a single mino relative to the piece's top-left corner
pub type MinoOffset = (i8, i8);

/// Largest supported matrix side
pub const MAX_SHAPE_DIM: usize = 4;

/// Upper bound on occupied cells in a shape
pub const MAX_CELLS: usize = MAX_SHAPE_DIM * MAX_SHAPE_DIM;

/// Occupancy grid, row-major (`matrix[y][x]`)
pub type ShapeMatrix = Vec<Vec<bool>>;

/// Occupied cells of one orientation
pub type ShapeCells = ArrayVec<MinoOffset, MAX_CELLS>;

/// Rotate a shape matrix 90° clockwise
///
/// ```
/// use neon_drop_core::pieces::rotate_matrix_cw;
///
/// // J piece: 2x3 -> 3x2
/// let j = vec![vec![true, false, false], vec![true, true, true]];
/// let rotated = rotate_matrix_cw(&j);
/// assert_eq!(
///     rotated,
///     vec![vec![true, true], vec![true, false], vec![true, false]]
/// );
/// ```
pub fn rotate_matrix_cw(matrix: &[Vec<bool>]) -> ShapeMatrix {
    let rows = matrix.len();
    let cols = matrix.first().map_or(0, Vec::len);
    let mut rotated = vec![vec![false; rows]; cols];
    for (y, row) in matrix.iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            rotated[x][rows - 1 - y] = filled;
        }
    }
    rotated
}

/// Apply the clockwise transform `rotation.index()` times from the base orientation
pub fn rotate_matrix(base: &[Vec<bool>], rotation: Rotation) -> ShapeMatrix {
    let mut matrix = base.to_vec();
    for _ in 0..rotation.index() {
        matrix = rotate_matrix_cw(&matrix);
    }
    matrix
}

fn occupied_cells(matrix: &[Vec<bool>]) -> ShapeCells {
    let mut cells = ShapeCells::new();
    for (y, row) in matrix.iter().enumerate() {
        for (x, &filled) in row.iter().enumerate() {
            if filled {
                cells.push((x as i8, y as i8));
            }
        }
    }
    cells
}

/// Spawn column that centres a matrix of `width` columns
pub fn centered_spawn_x(width: usize) -> i8 {
    ((BOARD_WIDTH as usize).saturating_sub(width) / 2) as i8
}

/// A compiled piece definition: base matrix, colour, spawn offset and all four orientations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceShape {
    kind: PieceKind,
    color: String,
    spawn: (i8, i8),
    base: ShapeMatrix,
    rotations: [ShapeCells; 4],
}

impl PieceShape {
    /// Compile a matrix that is already known to fit in 4x4
    pub(crate) fn compile(
        kind: PieceKind,
        base: ShapeMatrix,
        color: impl Into<String>,
        spawn: (i8, i8),
    ) -> Self {
        let rotations = [
            Rotation::R0,
            Rotation::R90,
            Rotation::R180,
            Rotation::R270,
        ]
        .map(|r| occupied_cells(&rotate_matrix(&base, r)));

        Self {
            kind,
            color: color.into(),
            spawn,
            base,
            rotations,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Colour token handed to the renderer
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Spawn position (x, y) of the matrix's top-left corner
    pub fn spawn(&self) -> (i8, i8) {
        self.spawn
    }

    /// Base (0°) occupancy matrix
    pub fn base(&self) -> &ShapeMatrix {
        &self.base
    }

    /// Occupancy matrix for a rotation
    pub fn matrix(&self, rotation: Rotation) -> ShapeMatrix {
        rotate_matrix(&self.base, rotation)
    }

    /// Occupied cell offsets for a rotation
    pub fn cells(&self, rotation: Rotation) -> &[MinoOffset] {
        &self.rotations[rotation.index()]
    }
}

/// Built-in matrices, written as rows of 0/1 like the JSON configuration
const STANDARD_SHAPES: [(PieceKind, &[&[u8]], &str); 8] = [
    (PieceKind::I, &[&[1, 1, 1, 1]], "#00f0ff"),
    (PieceKind::J, &[&[1, 0, 0], &[1, 1, 1]], "#2f6bff"),
    (PieceKind::L, &[&[0, 0, 1], &[1, 1, 1]], "#ff8c1a"),
    (PieceKind::O, &[&[1, 1], &[1, 1]], "#ffe600"),
    (PieceKind::S, &[&[0, 1, 1], &[1, 1, 0]], "#39ff14"),
    (PieceKind::T, &[&[0, 1, 0], &[1, 1, 1]], "#c03cff"),
    (PieceKind::Z, &[&[1, 1, 0], &[0, 1, 1]], "#ff2d55"),
    (PieceKind::Float, &[&[1]], "#ffffff"),
];

/// Convert a 0/1 grid into an occupancy matrix
pub fn matrix_from_rows<R: AsRef<[u8]>>(rows: &[R]) -> ShapeMatrix {
    rows.iter()
        .map(|row| row.as_ref().iter().map(|&v| v != 0).collect())
        .collect()
}

/// Strongly typed mapping from every [`PieceKind`] to its compiled shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceTable {
    shapes: [PieceShape; 8],
}

impl PieceTable {
    /// Build from compiled shapes indexed by `PieceKind::index()`
    pub(crate) fn from_shapes(shapes: [PieceShape; 8]) -> Self {
        Self { shapes }
    }

    /// The built-in NeonDrop piece set
    pub fn standard() -> Self {
        let shapes = STANDARD_SHAPES.map(|(kind, rows, color)| {
            let base = matrix_from_rows(rows);
            let spawn = (centered_spawn_x(base[0].len()), 0);
            PieceShape::compile(kind, base, color, spawn)
        });
        Self { shapes }
    }

    /// Shape for a piece kind
    pub fn get(&self, kind: PieceKind) -> &PieceShape {
        &self.shapes[kind.index()]
    }

    /// Iterate shapes in `PieceKind::ALL` order
    pub fn iter(&self) -> impl Iterator<Item = &PieceShape> {
        self.shapes.iter()
    }
}

impl Default for PieceTable {
    fn default() -> Self {
        Self::standard()
    }
}
