//! Plain-text rendering of a life grid.

use std::fmt::Write;

use life_grid::{Bracket, BracketSide, Category, LifeAnalysis, WEEKS_PER_YEAR};

/// Width of each bracket gutter, label included
const GUTTER_WIDTH: usize = 13;

/// Marks the present week
pub const CURRENT_WEEK_GLYPH: char = '@';

/// One glyph per category
pub fn glyph(category: Category) -> char {
    match category {
        Category::Sleep => 'z',
        Category::Study => 's',
        Category::Work => 'w',
        Category::Retirement => 'r',
        Category::Leisure => 'l',
        Category::Sports => 'p',
        Category::Family => 'f',
        Category::Travel => 't',
        Category::Future => '.',
        Category::Lived => '#',
    }
}

/// Render the grid with bracket gutters, then legend, stats and insight
pub fn render(name: &str, analysis: &LifeAnalysis) -> String {
    let mut out = String::new();
    let title = if name.is_empty() { "Your life in weeks" } else { name };
    let _ = writeln!(out, "{} ({})", title, analysis.mode.as_str());
    let _ = writeln!(out);

    let current = analysis
        .current_week
        .and_then(|w| usize::try_from(w).ok());

    for (row, cells) in analysis.grid.rows().enumerate() {
        let left = gutter(&analysis.brackets, BracketSide::Left, row);
        let right = gutter(&analysis.brackets, BracketSide::Right, row);

        let line: String = cells
            .iter()
            .enumerate()
            .map(|(column, &category)| {
                if current == Some(row * WEEKS_PER_YEAR + column) {
                    CURRENT_WEEK_GLYPH
                } else {
                    glyph(category)
                }
            })
            .collect();

        let _ = writeln!(
            out,
            "{:>width$} {:>3} {:<cols$} {}",
            left,
            row + 1,
            line,
            right,
            width = GUTTER_WIDTH,
            cols = WEEKS_PER_YEAR
        );
    }

    let _ = writeln!(out);
    out.push_str(&render_stats(analysis));
    out
}

/// Legend with week counts, year equivalents and lifespan shares
pub fn render_stats(analysis: &LifeAnalysis) -> String {
    let mut out = String::new();
    let stats = &analysis.stats;

    let _ = writeln!(out, "Legend");
    let _ = writeln!(out, "======");
    for category in Category::ALL {
        if let Some(stat) = stats.get(category) {
            let _ = writeln!(
                out,
                "  {} {:<11} {:>6} weeks {:>6.1} years {:>5.1}%",
                glyph(category),
                category.as_str(),
                stat.week_count,
                stat.year_equivalent,
                stat.percentage_of_lifespan
            );
        }
    }
    if analysis.current_week.is_some() {
        let _ = writeln!(out, "  {} this week", CURRENT_WEEK_GLYPH);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Lived {} of {} weeks ({:.1}%), {} remaining",
        stats.lived_weeks,
        stats.total_weeks,
        stats.lived_percentage(),
        stats.remaining_weeks
    );
    let _ = writeln!(
        out,
        "More of your life goes to {} than to {}.",
        analysis.insight.higher, analysis.insight.lower
    );
    out
}

/// Gutter text for one side of one row.
///
/// A bracket starting on this row wins and shows its label; otherwise the
/// first bracket covering the row draws its continuation.
fn gutter(brackets: &[Bracket], side: BracketSide, row: usize) -> String {
    let mut covering = brackets
        .iter()
        .filter(|b| b.side == side && b.start_row <= row && row <= b.end_row);

    let starting = brackets
        .iter()
        .find(|b| b.side == side && b.start_row == row);

    match starting.or_else(|| covering.next()) {
        Some(bracket) => {
            let mark = bracket_mark(bracket, side, row);
            if bracket.start_row == row {
                match side {
                    BracketSide::Left => format!("{} {}", bracket.category, mark),
                    BracketSide::Right => format!("{} {}", mark, bracket.category),
                }
            } else {
                mark.to_string()
            }
        }
        None => String::new(),
    }
}

fn bracket_mark(bracket: &Bracket, side: BracketSide, row: usize) -> char {
    let single = bracket.start_row == bracket.end_row;
    match (side, single, row == bracket.start_row, row == bracket.end_row) {
        (BracketSide::Left, true, _, _) => '[',
        (BracketSide::Right, true, _, _) => ']',
        (BracketSide::Left, false, true, _) => '┌',
        (BracketSide::Right, false, true, _) => '┐',
        (BracketSide::Left, false, _, true) => '└',
        (BracketSide::Right, false, _, true) => '┘',
        (_, false, false, false) => '│',
    }
}
