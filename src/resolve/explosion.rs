//! Chain-reaction resolution.
//!
//! Drains queued growth in discrete waves until the board is stable. Each
//! wave applies all pending growth at once, marks every cell that reached
//! capacity, clears the marked cells, and only then distributes their units
//! to the neighbors. Marking before clearing means simultaneous explosions
//! all read pre-explosion ownership, so scan order cannot bias the outcome
//! of a wave.

use tracing::{debug, trace, warn};

use crate::board::{neighbor_indices, Coord, Grid, Player, CELL_COUNT, PLAYER_COUNT};
use crate::events::{EventSink, GameEvent};

/// Default safety cap on waves per resolution.
pub const DEFAULT_MAX_WAVES: u32 = 10_000;

const TOUCHED: u8 = 1;
const EXPLODED: u8 = 2;

/// Per-resolution knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Stop draining as soon as one player owns every owned cell.
    ///
    /// A saturated single-owner board can hold more units than it can
    /// stabilize, so the chain would otherwise never end.
    pub stop_when_uniform: bool,
    /// Hard cap on waves. Reaching it leaves growth queued on the board.
    pub max_waves: u32,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        ResolveOptions {
            stop_when_uniform: true,
            max_waves: DEFAULT_MAX_WAVES,
        }
    }
}

/// Why draining stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopReason {
    /// No growth left anywhere.
    #[default]
    Stable,
    /// One player owns the whole occupied board.
    Uniform,
    /// `max_waves` reached.
    WaveLimit,
}

/// Aggregate outcome of one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Waves that applied growth.
    pub waves: u32,
    /// Cell explosions across all waves.
    pub explosions: u32,
    /// Owned cells per player after draining, indexed by `Player::index`.
    pub cell_counts: [u32; PLAYER_COUNT],
    /// The sole owner of every owned cell, if there is one.
    pub uniform: Option<Player>,
    /// Why draining ended; anything but `Stable` leaves growth queued.
    pub stop: StopReason,
}

impl Resolution {
    /// Returns true if at least one cell exploded.
    pub fn exploded(&self) -> bool {
        self.explosions > 0
    }

    /// Returns true if the wave cap cut the chain short.
    pub fn truncated(&self) -> bool {
        self.stop == StopReason::WaveLimit
    }
}

/// Reusable resolver that keeps its scratch buffers across calls.
#[derive(Debug, Clone)]
pub struct Resolver {
    flags: [u8; CELL_COUNT],
    exploding: Vec<(usize, Player)>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            flags: [0; CELL_COUNT],
            exploding: Vec::with_capacity(CELL_COUNT),
        }
    }

    /// Drains all pending growth on `grid`, emitting one `CellUpdated` per
    /// changed cell per wave and calling `end_wave` after every wave.
    pub fn resolve<S: EventSink + ?Sized>(
        &mut self,
        grid: &mut Grid,
        options: &ResolveOptions,
        sink: &mut S,
    ) -> Resolution {
        let mut waves = 0u32;
        let mut explosions = 0u32;
        let stop = loop {
            if !grid.has_pending() {
                break StopReason::Stable;
            }
            if waves >= options.max_waves {
                warn!(waves, units = grid.total_units(), "wave limit reached, chain left unresolved");
                break StopReason::WaveLimit;
            }
            explosions += self.step(grid, sink);
            waves += 1;
            sink.end_wave();
            if options.stop_when_uniform && grid.has_pending() && grid.uniform_owner().is_some() {
                break StopReason::Uniform;
            }
        };

        let resolution = Resolution {
            waves,
            explosions,
            cell_counts: grid.cell_counts(),
            uniform: grid.uniform_owner(),
            stop,
        };
        debug!(waves, explosions, ?stop, "resolved");
        resolution
    }

    /// Runs one wave. Returns the number of cells that exploded.
    fn step<S: EventSink + ?Sized>(&mut self, grid: &mut Grid, sink: &mut S) -> u32 {
        self.flags.fill(0);
        self.exploding.clear();
        let cells = grid.cells_mut();

        // Apply queued growth. Growth past capacity is carried to the next
        // wave instead of being dropped.
        for (i, cell) in cells.iter_mut().enumerate() {
            if cell.pending_growth == 0 {
                continue;
            }
            let total = u32::from(cell.count) + u32::from(cell.pending_growth);
            let cap = u32::from(cell.capacity);
            if total > cap {
                cell.count = cell.capacity;
                cell.pending_growth = (total - cap) as u16;
            } else {
                cell.count = total as u8;
                cell.pending_growth = 0;
            }
            self.flags[i] |= TOUCHED;
        }

        for (i, cell) in cells.iter().enumerate() {
            if cell.is_critical() {
                match cell.owner {
                    Some(owner) => self.exploding.push((i, owner)),
                    None => debug_assert!(false, "critical cell {i} has no owner"),
                }
            }
        }

        for &(i, _) in &self.exploding {
            let cell = &mut cells[i];
            cell.count = 0;
            // Carried growth keeps its owner until it lands.
            if cell.pending_growth == 0 {
                cell.owner = None;
            }
            self.flags[i] |= TOUCHED | EXPLODED;
        }

        // Ownership moves when growth is queued, not when it lands. The
        // last exploder in index order wins a contested neighbor.
        for &(i, owner) in &self.exploding {
            for &n in neighbor_indices(i) {
                let n = n as usize;
                cells[n].pending_growth += 1;
                cells[n].owner = Some(owner);
                self.flags[n] |= TOUCHED;
            }
        }

        for (i, &flag) in self.flags.iter().enumerate() {
            if flag & TOUCHED == 0 {
                continue;
            }
            let cell = &cells[i];
            sink.on_event(GameEvent::CellUpdated {
                coord: Coord::from_index(i),
                owner: cell.owner,
                count: cell.count,
                exploded: flag & EXPLODED != 0,
            });
        }

        trace!(exploded = self.exploding.len(), "wave");
        self.exploding.len() as u32
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot helper: resolves `grid` with a fresh resolver.
pub fn resolve_grid<S: EventSink + ?Sized>(
    grid: &mut Grid,
    options: &ResolveOptions,
    sink: &mut S,
) -> Resolution {
    Resolver::new().resolve(grid, options, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{NullSink, Recorder};

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y)
    }

    fn no_early_exit() -> ResolveOptions {
        ResolveOptions {
            stop_when_uniform: false,
            ..ResolveOptions::default()
        }
    }

    #[test]
    fn empty_placement_lands_in_one_wave() {
        let mut grid = Grid::new();
        grid.place(c(4, 3), Player::One).unwrap();
        let mut rec = Recorder::new();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut rec);

        assert_eq!(res.waves, 1);
        assert!(!res.exploded());
        assert_eq!(res.stop, StopReason::Stable);
        assert_eq!(grid.count(c(4, 3)), 1);
        assert_eq!(res.cell_counts, [1, 0, 0, 0]);
        assert_eq!(
            rec.waves,
            vec![vec![GameEvent::CellUpdated {
                coord: c(4, 3),
                owner: Some(Player::One),
                count: 1,
                exploded: false,
            }]]
        );
    }

    #[test]
    fn stable_grid_does_no_work() {
        let mut grid = Grid::new();
        grid.set_cell(c(1, 1), Some(Player::Two), 3);
        let mut rec = Recorder::new();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut rec);
        assert_eq!(res.waves, 0);
        assert!(rec.events.is_empty());
        assert_eq!(res.uniform, Some(Player::Two));
    }

    #[test]
    fn corner_explodes_into_both_neighbors() {
        let mut grid = Grid::new();
        grid.set_cell(c(0, 0), Some(Player::One), 1);
        grid.place(c(0, 0), Player::One).unwrap();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut NullSink);

        assert_eq!(res.waves, 2);
        assert_eq!(res.explosions, 1);
        assert_eq!(grid.owner(c(0, 0)), None);
        assert_eq!(grid.count(c(0, 0)), 0);
        assert_eq!(grid.cell(c(1, 0)).owner, Some(Player::One));
        assert_eq!(grid.count(c(1, 0)), 1);
        assert_eq!(grid.count(c(0, 1)), 1);
        assert!(grid.is_stable());
    }

    #[test]
    fn chain_from_edge_reaches_corner() {
        // (1,0) explodes and pushes the corner to capacity, which then
        // explodes back into (1,0) and (0,1).
        let mut grid = Grid::new();
        grid.set_cell(c(0, 0), Some(Player::One), 1);
        grid.set_cell(c(1, 0), Some(Player::One), 2);
        grid.place(c(1, 0), Player::One).unwrap();
        let mut rec = Recorder::new();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut rec);

        assert_eq!(res.explosions, 2);
        assert_eq!(rec.explosions().collect::<Vec<_>>(), vec![c(1, 0), c(0, 0)]);
        assert_eq!(grid.owner(c(0, 0)), None);
        assert_eq!(grid.count(c(1, 0)), 1);
        assert_eq!(grid.count(c(0, 1)), 1);
        assert_eq!(grid.count(c(2, 0)), 1);
        assert_eq!(grid.count(c(1, 1)), 1);
        assert_eq!(grid.total_units(), 4);
    }

    #[test]
    fn explosion_captures_enemy_neighbor() {
        let mut grid = Grid::new();
        grid.set_cell(c(0, 0), Some(Player::One), 1);
        grid.set_cell(c(1, 0), Some(Player::Two), 1);
        grid.place(c(0, 0), Player::One).unwrap();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut NullSink);

        assert_eq!(grid.owner(c(1, 0)), Some(Player::One));
        assert_eq!(grid.count(c(1, 0)), 2);
        assert_eq!(res.cell_counts, [2, 0, 0, 0]);
        assert_eq!(res.uniform, Some(Player::One));
    }

    #[test]
    fn simultaneous_explosions_read_state_before_clearing() {
        let mut grid = Grid::new();
        grid.set_cell(c(0, 0), Some(Player::One), 1);
        grid.set_cell(c(1, 0), Some(Player::One), 2);
        grid.set_cell(c(0, 1), Some(Player::One), 2);
        grid.place(c(0, 0), Player::One).unwrap();
        let mut rec = Recorder::new();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut rec);

        // wave 1: corner; wave 2: both edges at once; wave 3: corner again
        // from the two returned units; wave 4: growth only.
        assert_eq!(res.waves, 4);
        assert_eq!(res.explosions, 4);
        let exploded_in = |w: usize| -> Vec<Coord> {
            rec.waves[w]
                .iter()
                .filter_map(|e| match e {
                    GameEvent::CellUpdated { coord, exploded: true, .. } => Some(*coord),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(exploded_in(0), vec![c(0, 0)]);
        assert_eq!(exploded_in(1), vec![c(1, 0), c(0, 1)]);
        assert_eq!(exploded_in(2), vec![c(0, 0)]);
        assert!(exploded_in(3).is_empty());

        assert_eq!(grid.count(c(1, 1)), 2);
        assert_eq!(grid.count(c(1, 0)), 1);
        assert_eq!(grid.count(c(0, 1)), 1);
        assert_eq!(grid.count(c(2, 0)), 1);
        assert_eq!(grid.count(c(0, 2)), 1);
        assert_eq!(grid.total_units(), 6);
        assert!(grid.is_stable());
    }

    #[test]
    fn excess_growth_carries_to_next_wave() {
        let mut grid = Grid::new();
        grid.set_cell(c(0, 0), Some(Player::One), 1);
        grid.set_cell(c(1, 0), Some(Player::One), 2);
        grid.set_cell(c(0, 1), Some(Player::One), 2);
        grid.set_cell(c(1, 1), Some(Player::Two), 3);
        grid.place(c(0, 0), Player::One).unwrap();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut NullSink);

        // (1,1) receives two units at once: 3 + 2 clamps to 4 and explodes,
        // the fifth unit lands on the wave after.
        assert_eq!(res.waves, 4);
        assert_eq!(res.explosions, 5);
        assert_eq!(grid.owner(c(1, 1)), Some(Player::One));
        assert_eq!(grid.count(c(1, 1)), 1);
        assert_eq!(grid.count(c(1, 0)), 2);
        assert_eq!(grid.count(c(0, 1)), 2);
        assert_eq!(grid.count(c(2, 1)), 1);
        assert_eq!(grid.count(c(1, 2)), 1);
        assert_eq!(grid.total_units(), 9);
        assert_eq!(res.cell_counts, [7, 0, 0, 0]);
        assert!(grid.is_stable());
    }

    fn saturated_grid(owner: Player) -> Grid {
        let mut grid = Grid::new();
        for coord in crate::board::all_coords() {
            let cap = grid.capacity(coord);
            grid.set_cell(coord, Some(owner), cap - 1);
        }
        grid
    }

    #[test]
    fn uniform_board_stops_early() {
        let mut grid = saturated_grid(Player::Three);
        let before = grid.total_units();
        grid.place(c(5, 3), Player::Three).unwrap();
        let res = resolve_grid(&mut grid, &ResolveOptions::default(), &mut NullSink);

        assert_eq!(res.stop, StopReason::Uniform);
        assert_eq!(res.uniform, Some(Player::Three));
        assert_eq!(grid.total_units(), before + 1);
    }

    #[test]
    fn wave_limit_caps_runaway_chain() {
        let mut grid = saturated_grid(Player::One);
        grid.place(c(0, 0), Player::One).unwrap();
        let options = ResolveOptions {
            stop_when_uniform: false,
            max_waves: 50,
        };
        let mut rec = Recorder::new();
        let res = resolve_grid(&mut grid, &options, &mut rec);

        assert!(res.truncated());
        assert_eq!(res.waves, 50);
        assert_eq!(rec.waves.len(), 50);
        assert!(grid.has_pending());
    }

    #[test]
    fn resolver_is_reusable() {
        let mut resolver = Resolver::new();
        let mut grid = Grid::new();
        grid.set_cell(c(0, 0), Some(Player::One), 1);
        grid.place(c(0, 0), Player::One).unwrap();
        let first = resolver.resolve(&mut grid, &no_early_exit(), &mut NullSink);
        grid.place(c(9, 6), Player::Two).unwrap();
        let second = resolver.resolve(&mut grid, &no_early_exit(), &mut NullSink);
        assert_eq!(first.explosions, 1);
        assert_eq!(second.explosions, 0);
        assert_eq!(second.cell_counts, [2, 1, 0, 0]);
    }

    #[test]
    fn primed_rows_chain_settles() {
        // Same position as the chain benchmark.
        let mut grid = Grid::new();
        for coord in crate::board::all_coords().filter(|c| c.y < 4) {
            let owner = if (coord.x + coord.y) % 2 == 0 { Player::One } else { Player::Two };
            grid.set_cell(coord, Some(owner), grid.capacity(coord) - 1);
        }
        assert_eq!(grid.total_units(), 102);

        grid.place(c(0, 0), Player::One).unwrap();
        let res = resolve_grid(&mut grid, &no_early_exit(), &mut NullSink);

        assert_eq!(res.stop, StopReason::Stable);
        assert!(res.waves > 1);
        // every primed cell is reached by the cascade
        assert!(res.explosions >= 40, "only {} explosions", res.explosions);
        assert_eq!(grid.total_units(), 103);
        assert!(grid.cells().iter().all(|cell| cell.count < cell.capacity));
    }
}
