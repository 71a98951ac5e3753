use std::collections::BTreeSet;

use proptest::prelude::*;
use sweeper_core::*;

fn topology() -> impl Strategy<Value = Topology> {
    prop_oneof![
        (1u16..9, 1u16..9).prop_map(|(width, height)| Topology::Square { width, height }),
        (0u16..4).prop_map(|radius| Topology::Hexagon { radius }),
        (1u16..7, 1u16..7).prop_map(|(cols, rows)| Topology::HexRect { cols, rows }),
    ]
}

/// Grid plus a random stage: roughly a fifth mines, a tenth blocked.
fn staged_grid() -> impl Strategy<Value = (Grid, Stage)> {
    topology().prop_flat_map(|topology| {
        let grid = Grid::new(topology);
        let len = grid.len();
        (Just(grid), proptest::collection::vec(0u8..10, len)).prop_map(|(grid, rolls)| {
            let mut stage = Stage::default();
            for (&coords, roll) in grid.cells().iter().zip(rolls) {
                match roll {
                    0 | 1 => stage.mines.push(coords),
                    2 => stage.blocked.push(coords),
                    _ => {}
                }
            }
            (grid, stage)
        })
    })
}

#[derive(Copy, Clone, Debug)]
enum Op {
    Reveal(Coord2),
    Flag(Coord2),
    Chord(Coord2),
    ChordFlag(Coord2),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    let coords = (-4i32..10, -4i32..10);
    prop_oneof![
        4 => coords.clone().prop_map(Op::Reveal),
        3 => coords.clone().prop_map(Op::Flag),
        2 => coords.clone().prop_map(Op::Chord),
        1 => coords.prop_map(Op::ChordFlag),
        1 => Just(Op::Reset),
    ]
}

fn mine_reveal() -> impl Strategy<Value = MineRevealPolicy> {
    prop_oneof![
        Just(MineRevealPolicy::ImmediateLoss),
        Just(MineRevealPolicy::AccumulateMistakes),
    ]
}

fn apply(board: &mut Board, op: Op) {
    match op {
        Op::Reveal(coords) => {
            // staged boards never defer placement, so reveal cannot fail
            board.reveal(coords).unwrap();
        }
        Op::Flag(coords) => {
            board.toggle_flag(coords);
        }
        Op::Chord(coords) => {
            board.chord(coords);
        }
        Op::ChordFlag(coords) => {
            board.chord_flag(coords);
        }
        Op::Reset => board.reset_reveals_and_flags(),
    }
}

fn states(board: &Board) -> Vec<TileState> {
    board.tiles().map(|(_, tile)| tile.state()).collect()
}

fn check_counters(board: &Board) -> std::result::Result<(), TestCaseError> {
    let counters = board.counters();
    let mut covered = 0;
    let mut revealed = 0;
    let mut flagged = 0;
    for (_, tile) in board.tiles() {
        match tile.state() {
            TileState::Covered => covered += 1,
            TileState::Revealed => revealed += 1,
            TileState::Flagged => flagged += 1,
            TileState::Blocked => {}
        }
    }
    prop_assert_eq!(counters.flag_count, flagged);
    prop_assert_eq!(flagged + covered + revealed, counters.total_cells);
    prop_assert_eq!(
        counters.mines_left,
        counters.total_mines.saturating_sub(counters.flag_count)
    );
    Ok(())
}

/// Cells a flood from `start` must open, found by plain recursion.
fn expected_region(board: &Board, start: Coord2) -> BTreeSet<Coord2> {
    fn visit(board: &Board, coords: Coord2, seen: &mut BTreeSet<Coord2>) {
        let tile = board.tile(coords).unwrap();
        if tile.is_mine() || tile.is_blocked() || !seen.insert(coords) {
            return;
        }
        if tile.number() == 0 {
            for next in board.grid().neighbors(coords) {
                visit(board, next, seen);
            }
        }
    }

    let mut seen = BTreeSet::new();
    visit(board, start, &mut seen);
    seen
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn numbers_match_mine_neighbors((grid, stage) in staged_grid()) {
        let board = Board::new(grid, BoardConfig::staged(stage)).unwrap();

        for (coords, tile) in board.tiles() {
            if tile.is_blocked() {
                prop_assert!(!tile.is_mine());
                prop_assert_eq!(tile.number(), 0);
            } else if tile.is_mine() {
                prop_assert_eq!(tile.number(), Tile::MINE);
            } else {
                let mines = board
                    .grid()
                    .neighbors(coords)
                    .into_iter()
                    .filter(|&pos| board.tile(pos).unwrap().is_mine())
                    .count();
                prop_assert_eq!(tile.number() as usize, mines);
            }
        }
    }

    #[test]
    fn flood_opens_exactly_the_connected_region(
        (grid, stage) in staged_grid(),
        pick in any::<prop::sample::Index>(),
    ) {
        let board = Board::new(grid, BoardConfig::staged(stage)).unwrap();
        let safe: Vec<Coord2> = board
            .tiles()
            .filter(|(_, tile)| !tile.is_mine() && !tile.is_blocked())
            .map(|(coords, _)| coords)
            .collect();
        prop_assume!(!safe.is_empty());
        let start = *pick.get(&safe);

        let expected = expected_region(&board, start);
        let mut board = board;
        prop_assert!(board.reveal(start).unwrap().has_update());

        let opened: BTreeSet<Coord2> = board
            .tiles()
            .filter(|(_, tile)| tile.state() == TileState::Revealed)
            .map(|(coords, _)| coords)
            .collect();
        prop_assert_eq!(opened, expected);
    }

    #[test]
    fn first_click_is_always_clear(
        topology in topology(),
        seed in any::<u64>(),
        pick in any::<prop::sample::Index>(),
        density in 0.0f64..0.8,
    ) {
        let grid = Grid::new(topology);
        let start = *pick.get(grid.cells());
        let room = grid.len() - 1 - grid.neighbors(start).len();
        let mines = (room as f64 * density) as CellCount;

        let mut board = Board::new(grid, BoardConfig::first_click_safe(mines, seed)).unwrap();
        prop_assert!(board.reveal(start).unwrap().has_update());

        prop_assert_eq!(board.counters().total_mines, mines);
        prop_assert_eq!(board.tile(start).unwrap().number(), 0);
        for coords in board.grid().neighbors(start) {
            prop_assert!(!board.tile(coords).unwrap().is_mine());
        }
    }

    #[test]
    fn same_seed_same_board(seed in any::<u64>(), mines in 0u32..40) {
        let play = || {
            let config = BoardConfig::first_click_safe(mines, seed);
            let mut board = Board::new(Grid::square(9, 9), config).unwrap();
            board.reveal((4, 4)).unwrap();
            board
        };

        prop_assert_eq!(play(), play());
    }

    #[test]
    fn operations_keep_board_consistent(
        (grid, stage) in staged_grid(),
        mine_reveal in mine_reveal(),
        flag_mistakes in any::<bool>(),
        ops in proptest::collection::vec(op(), 1..60),
    ) {
        let config = BoardConfig::staged(stage)
            .with_mine_reveal(mine_reveal)
            .with_flag_mistakes(flag_mistakes);
        let mut board = Board::new(grid, config).unwrap();
        check_counters(&board)?;

        for op in ops {
            let before = board.clone();
            apply(&mut board, op);
            check_counters(&board)?;

            if matches!(op, Op::Reset) {
                continue;
            }
            if before.is_over() {
                prop_assert_eq!(&board, &before);
                continue;
            }

            for (old, new) in states(&before).into_iter().zip(states(&board)) {
                match old {
                    TileState::Revealed | TileState::Blocked => prop_assert_eq!(old, new),
                    TileState::Covered | TileState::Flagged => {}
                }
            }
            prop_assert!(board.mistakes() >= before.mistakes());
            if mine_reveal == MineRevealPolicy::AccumulateMistakes {
                prop_assert!(!board.phase().is_lost());
            }
        }
    }
}
