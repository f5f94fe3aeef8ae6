//! Bracket layout
//!
//! Groups contiguous runs of a category into row-span brackets for visual
//! annotation beside the grid. Runs of `future` are not annotated.
//!
//! Sides alternate greedily: a bracket starting close to where the previous
//! one ended goes in the opposite gutter. Three or more tightly packed runs
//! can still collide; this is accepted as an approximation.

use crate::types::{Bracket, BracketSide, Category, WeekGrid, WEEKS_PER_YEAR};

/// A bracket whose start row is within this many rows of the previous
/// bracket's end row switches sides
pub const SIDE_FLIP_DISTANCE_ROWS: usize = 2;

/// A maximal run of identical labels, as inclusive cell indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    category: Category,
    start: usize,
    end: usize,
}

/// Build brackets for every non-future run in the grid, in grid order
pub fn group_brackets(grid: &WeekGrid) -> Vec<Bracket> {
    let mut brackets: Vec<Bracket> = runs(grid.cells())
        .into_iter()
        .filter(|run| run.category != Category::Future)
        .map(|run| Bracket {
            category: run.category,
            start_row: run.start / WEEKS_PER_YEAR,
            end_row: run.end / WEEKS_PER_YEAR,
            side: BracketSide::Left,
        })
        .collect();

    assign_sides(&mut brackets);
    brackets
}

fn runs(cells: &[Category]) -> Vec<Run> {
    let mut runs = Vec::new();
    let Some(&first) = cells.first() else {
        return runs;
    };

    let mut current = Run {
        category: first,
        start: 0,
        end: 0,
    };

    for (index, &category) in cells.iter().enumerate().skip(1) {
        if category == current.category {
            current.end = index;
        } else {
            runs.push(current);
            current = Run {
                category,
                start: index,
                end: index,
            };
        }
    }
    runs.push(current);

    runs
}

fn assign_sides(brackets: &mut [Bracket]) {
    for i in 1..brackets.len() {
        let previous = brackets[i - 1];
        let current = &mut brackets[i];
        if current.start_row <= previous.end_row + SIDE_FLIP_DISTANCE_ROWS {
            current.side = previous.side.flipped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::allocate_categories;
    use crate::types::LifeParameters;
    use pretty_assertions::assert_eq;

    fn grid_of(runs: &[(Category, usize)]) -> WeekGrid {
        let cells = runs
            .iter()
            .flat_map(|&(category, len)| std::iter::repeat(category).take(len))
            .collect();
        WeekGrid::from_cells(cells)
    }

    #[test]
    fn test_empty_grid_has_no_brackets() {
        assert!(group_brackets(&WeekGrid::default()).is_empty());
    }

    #[test]
    fn test_future_runs_are_dropped() {
        let grid = grid_of(&[(Category::Future, 52 * 3)]);
        assert!(group_brackets(&grid).is_empty());
    }

    #[test]
    fn test_row_span_conversion() {
        let grid = grid_of(&[
            (Category::Sleep, 60),
            (Category::Work, 100),
            (Category::Future, 48),
        ]);
        let brackets = group_brackets(&grid);

        assert_eq!(brackets.len(), 2);
        // cells 0..=59
        assert_eq!((brackets[0].start_row, brackets[0].end_row), (0, 1));
        // cells 60..=159
        assert_eq!((brackets[1].start_row, brackets[1].end_row), (1, 3));
        assert_eq!(brackets[1].row_span(), 3);
    }

    #[test]
    fn test_sides_alternate_when_close() {
        let grid = grid_of(&[
            (Category::Sleep, 52),
            (Category::Study, 52),
            (Category::Work, 52),
        ]);
        let sides: Vec<BracketSide> = group_brackets(&grid).iter().map(|b| b.side).collect();

        assert_eq!(
            sides,
            vec![BracketSide::Left, BracketSide::Right, BracketSide::Left]
        );
    }

    #[test]
    fn test_distant_bracket_keeps_default_side() {
        let grid = grid_of(&[
            (Category::Sleep, 52),
            (Category::Future, 52 * 3),
            (Category::Travel, 52),
        ]);
        let brackets = group_brackets(&grid);

        assert_eq!(brackets.len(), 2);
        // travel starts on row 4, previous ended on row 0
        assert_eq!(brackets[1].start_row, 4);
        assert_eq!(brackets[1].side, BracketSide::Left);
    }

    #[test]
    fn test_flip_boundary_is_inclusive() {
        let grid = grid_of(&[
            (Category::Sleep, 52),
            (Category::Future, 52 * 2),
            (Category::Travel, 52),
        ]);
        let brackets = group_brackets(&grid);

        // starts on row 3 = previous end row 0 + 3
        assert_eq!(brackets[1].start_row, 3);
        assert_eq!(brackets[1].side, BracketSide::Left);

        let grid = grid_of(&[
            (Category::Sleep, 52),
            (Category::Future, 52),
            (Category::Travel, 52),
        ]);
        let brackets = group_brackets(&grid);
        assert_eq!(brackets[1].start_row, 2);
        assert_eq!(brackets[1].side, BracketSide::Right);
    }

    #[test]
    fn test_one_bracket_per_run_of_allocated_grid() {
        let params = LifeParameters::new("Marie", 34, 80);
        let grid = allocate_categories(&params);
        let brackets = group_brackets(&grid);

        let categories: Vec<Category> = brackets.iter().map(|b| b.category).collect();
        assert_eq!(categories, Category::FILL_ORDER.to_vec());
        assert!(brackets.iter().all(|b| b.category != Category::Future));
        assert_eq!(brackets[0].side, BracketSide::Left);
    }

    #[test]
    fn test_repeated_category_gives_separate_brackets() {
        let grid = grid_of(&[
            (Category::Lived, 10),
            (Category::Future, 10),
            (Category::Lived, 10),
        ]);
        let brackets = group_brackets(&grid);
        assert_eq!(brackets.len(), 2);
        assert!(brackets.iter().all(|b| b.category == Category::Lived));
    }
}
