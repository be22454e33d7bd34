//! Map geometry: tile indexing, neighbourhoods and distances for square and
//! hex maps, with optional wrapping on either axis.

use serde::{Deserialize, Serialize};

use crate::ids::TileIndex;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TopologyFlag {
    Hex,
    Iso,
    WrapX,
    WrapY,
}

impl TopologyFlag {
    pub const ALL: [TopologyFlag; 4] = [
        TopologyFlag::Hex,
        TopologyFlag::Iso,
        TopologyFlag::WrapX,
        TopologyFlag::WrapY,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TopologyFlag::Hex => "Hex",
            TopologyFlag::Iso => "Iso",
            TopologyFlag::WrapX => "WrapX",
            TopologyFlag::WrapY => "WrapY",
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of topology flags in force for a map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<TopologyFlag>", into = "Vec<TopologyFlag>")]
pub struct Topology(u8);

impl Topology {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn with(mut self, flag: TopologyFlag) -> Self {
        self.0 |= flag.bit();
        self
    }

    pub fn contains(self, flag: TopologyFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn flags(self) -> impl Iterator<Item = TopologyFlag> {
        TopologyFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl From<Vec<TopologyFlag>> for Topology {
    fn from(flags: Vec<TopologyFlag>) -> Self {
        flags.into_iter().fold(Topology::empty(), Topology::with)
    }
}

impl From<Topology> for Vec<TopologyFlag> {
    fn from(topology: Topology) -> Self {
        topology.flags().collect()
    }
}

/// Axial coordinates for a hex grid (q, r). The implicit cube coordinate is `s = -q - r`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const DIRECTIONS: [Hex; 6] = [
        Hex { q: 1, r: 0 },  // East
        Hex { q: 1, r: -1 }, // Northeast
        Hex { q: 0, r: -1 }, // Northwest
        Hex { q: -1, r: 0 }, // West
        Hex { q: -1, r: 1 }, // Southwest
        Hex { q: 0, r: 1 },  // Southeast
    ];

    #[inline]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    #[inline]
    pub fn distance(self, other: Hex) -> i32 {
        ((self.q - other.q).abs() + (self.r - other.r).abs() + (self.s() - other.s()).abs()) / 2
    }

    /// Odd-row offset coordinates to axial.
    fn from_offset(x: i32, y: i32) -> Hex {
        Hex {
            q: x - (y - (y & 1)) / 2,
            r: y,
        }
    }

    fn to_offset(self) -> (i32, i32) {
        (self.q + (self.r - (self.r & 1)) / 2, self.r)
    }
}

impl std::ops::Add for Hex {
    type Output = Hex;

    fn add(self, other: Hex) -> Hex {
        Hex {
            q: self.q + other.q,
            r: self.r + other.r,
        }
    }
}

const CARDINAL_SQUARE: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];
const ADJACENT_SQUARE: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Dimensions and topology of a map. Tiles are stored row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapGeometry {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub topology: Topology,
}

impl MapGeometry {
    pub fn new(width: u32, height: u32, topology: Topology) -> Self {
        Self {
            width,
            height,
            topology,
        }
    }

    pub fn tile_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn is_hex(&self) -> bool {
        self.topology.contains(TopologyFlag::Hex)
    }

    pub fn coords(&self, tile: TileIndex) -> (i32, i32) {
        let width = self.width.max(1);
        ((tile.0 % width) as i32, (tile.0 / width) as i32)
    }

    /// Resolve native coordinates to a tile, wrapping where the topology allows.
    pub fn index_of(&self, x: i32, y: i32) -> Option<TileIndex> {
        let (w, h) = (self.width as i32, self.height as i32);
        if w == 0 || h == 0 {
            return None;
        }
        let x = if self.topology.contains(TopologyFlag::WrapX) {
            x.rem_euclid(w)
        } else {
            x
        };
        let y = if self.topology.contains(TopologyFlag::WrapY) {
            y.rem_euclid(h)
        } else {
            y
        };
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        Some(TileIndex((y * w + x) as u32))
    }

    fn step(&self, tile: TileIndex, dx: i32, dy: i32) -> Option<TileIndex> {
        let (x, y) = self.coords(tile);
        self.index_of(x + dx, y + dy)
    }

    fn hex_neighbors(&self, tile: TileIndex) -> Vec<TileIndex> {
        let (x, y) = self.coords(tile);
        let center = Hex::from_offset(x, y);
        Hex::DIRECTIONS
            .into_iter()
            .filter_map(|d| {
                let (nx, ny) = (center + d).to_offset();
                self.index_of(nx, ny)
            })
            .collect()
    }

    /// Tiles sharing an edge with `tile`. On hex maps every neighbour shares an edge.
    pub fn cardinal_neighbors(&self, tile: TileIndex) -> Vec<TileIndex> {
        if self.is_hex() {
            return self.hex_neighbors(tile);
        }
        let mut out: Vec<TileIndex> = CARDINAL_SQUARE
            .iter()
            .filter_map(|&(dx, dy)| self.step(tile, dx, dy))
            .filter(|t| *t != tile)
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Tiles sharing an edge or a corner with `tile`.
    pub fn adjacent_neighbors(&self, tile: TileIndex) -> Vec<TileIndex> {
        if self.is_hex() {
            return self.hex_neighbors(tile);
        }
        let mut out: Vec<TileIndex> = ADJACENT_SQUARE
            .iter()
            .filter_map(|&(dx, dy)| self.step(tile, dx, dy))
            .filter(|t| *t != tile)
            .collect();
        out.sort();
        out.dedup();
        out
    }

    fn wrapped_delta(&self, a: i32, b: i32, extent: u32, wraps: bool) -> i32 {
        let d = (a - b).abs();
        if wraps {
            d.min(extent as i32 - d)
        } else {
            d
        }
    }

    /// Squared distance between two tiles. Hex maps use the squared hex step count.
    pub fn sq_distance(&self, a: TileIndex, b: TileIndex) -> i32 {
        let (ax, ay) = self.coords(a);
        let (bx, by) = self.coords(b);
        if self.is_hex() {
            let ha = Hex::from_offset(ax, ay);
            let mut best = i32::MAX;
            let shifts: &[i32] = if self.topology.contains(TopologyFlag::WrapX) {
                &[-1, 0, 1]
            } else {
                &[0]
            };
            for shift in shifts {
                let hb = Hex::from_offset(bx + shift * self.width as i32, by);
                best = best.min(ha.distance(hb));
            }
            return best * best;
        }
        let dx = self.wrapped_delta(ax, bx, self.width, self.topology.contains(TopologyFlag::WrapX));
        let dy = self.wrapped_delta(ay, by, self.height, self.topology.contains(TopologyFlag::WrapY));
        dx * dx + dy * dy
    }

    /// Every tile whose squared distance from `center` is at most `radius_sq`,
    /// including `center` itself, in storage order.
    pub fn tiles_within(&self, center: TileIndex, radius_sq: i32) -> Vec<TileIndex> {
        if radius_sq < 0 {
            return Vec::new();
        }
        let reach = (radius_sq as f64).sqrt() as i32 + 1;
        let (cx, cy) = self.coords(center);
        let mut out = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if let Some(tile) = self.index_of(cx + dx, cy + dy) {
                    if self.sq_distance(center, tile) <= radius_sq {
                        out.push(tile);
                    }
                }
            }
        }
        out.sort();
        out.dedup();
        out
    }
}
