//! Filler and renderer.
//!
//! The filler pads each wrapped cell to the rectangular block its row
//! requires; the renderer turns a grid of padded blocks into final text,
//! one pure function per [`Layout`]. The box-drawing layouts (`grid` and
//! its glyph variants) share a single generic renderer parameterized by a
//! [`BoxChars`] table, following the glyph-table idiom used elsewhere in
//! the wider table-rendering ecosystem for exactly this kind of mechanical
//! variation.

use crate::width::dw;
use crate::wrap::{wrap, WrapOpts};

/// Which table layout to render. `Grid` is the default; the rest are
/// mechanical glyph or rule variations over the same two skeletons (boxed
/// grid, bare horizontal rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Layout {
    Grid,
    Hline,
    Rounded,
    Heavy,
    Mixed,
    Double,
    Fancy,
    Github,
    Plain,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use clap::ValueEnum;
        f.write_str(self.to_possible_value().expect("no skipped variants").get_name())
    }
}

impl Layout {
    /// Display columns consumed by this layout's separators and padding,
    /// for a table with `n_cols` columns. Constant in row count.
    pub fn overhead(self, n_cols: usize) -> usize {
        match self {
            Layout::Hline | Layout::Plain => 2 * n_cols.saturating_sub(1),
            _ => 3 * n_cols + 1,
        }
    }
}

/// One padded, rectangular block of text: `lines.len() == height`, and
/// every line's display width equals the column's final width.
pub type Block = Vec<String>;

/// A fully wrapped-and-padded table: `rows[r][c]` is cell `(r, c)`'s block,
/// already padded to `(row_height[r], widths[c])`.
pub struct Filled {
    pub rows: Vec<Vec<Block>>,
    pub widths: Vec<usize>,
}

/// Wraps and pads every cell of `table` at the given final `widths`.
///
/// Returns the filled grid together with the set of `(row, col)` cells
/// whose wrapped text exceeds its column width, the `OverWidth` condition
/// the driver escalates in strict mode. Unlike the planning-time oracle,
/// this check applies to every column, fixed or planned: a user-fixed
/// column that is simply too narrow for its content is exactly the case
/// this diagnostic exists to catch.
pub fn fill(
    table: &crate::model::Table,
    widths: &[usize],
    opts: &WrapOpts,
) -> (Filled, Vec<(usize, usize)>) {
    let mut rows = Vec::with_capacity(table.n_rows());
    let mut over_width = Vec::new();

    for r in 0..table.n_rows() {
        let wrapped: Vec<Vec<String>> = (0..table.n_cols())
            .map(|c| wrap(table.cell(r, c), widths[c], opts))
            .collect();
        let height = wrapped.iter().map(|lines| lines.len()).max().unwrap_or(1);

        let mut row_blocks = Vec::with_capacity(table.n_cols());
        for (c, lines) in wrapped.into_iter().enumerate() {
            let width = widths[c];
            let mut block = Vec::with_capacity(height);
            for line_idx in 0..height {
                let text = lines.get(line_idx).map(String::as_str).unwrap_or("");
                if dw(text) > width {
                    over_width.push((r, c));
                }
                block.push(pad(text, width));
            }
            row_blocks.push(block);
        }
        rows.push(row_blocks);
    }

    (
        Filled {
            rows,
            widths: widths.to_vec(),
        },
        over_width,
    )
}

/// Pads `text` with trailing spaces to `width` display columns. If `text`
/// is already at or past `width` (the over-width case) it is left as-is;
/// the caller has already recorded the violation.
fn pad(text: &str, width: usize) -> String {
    let text_w = dw(text);
    if text_w >= width {
        text.to_string()
    } else {
        let mut s = String::with_capacity(text.len() + (width - text_w));
        s.push_str(text);
        s.push_str(&" ".repeat(width - text_w));
        s
    }
}

/// The glyphs a box-drawing layout uses. Index order mirrors the
/// `BoxChar` convention of naming corners, crosses and rules.
#[derive(Debug, Clone, Copy)]
struct BoxChars {
    top_left: char,
    top_right: char,
    bottom_left: char,
    bottom_right: char,
    cross: char,
    tee_down: char,
    tee_up: char,
    tee_right: char,
    tee_left: char,
    horizontal: char,
    vertical: char,
}

const GRID: BoxChars = BoxChars {
    top_left: '+',
    top_right: '+',
    bottom_left: '+',
    bottom_right: '+',
    cross: '+',
    tee_down: '+',
    tee_up: '+',
    tee_right: '+',
    tee_left: '+',
    horizontal: '-',
    vertical: '|',
};

const ROUNDED: BoxChars = BoxChars {
    top_left: '╭',
    top_right: '╮',
    bottom_left: '╰',
    bottom_right: '╯',
    cross: '┼',
    tee_down: '┬',
    tee_up: '┴',
    tee_right: '├',
    tee_left: '┤',
    horizontal: '─',
    vertical: '│',
};

const HEAVY: BoxChars = BoxChars {
    top_left: '┏',
    top_right: '┓',
    bottom_left: '┗',
    bottom_right: '┛',
    cross: '╋',
    tee_down: '┳',
    tee_up: '┻',
    tee_right: '┣',
    tee_left: '┫',
    horizontal: '━',
    vertical: '┃',
};

/// Heavy outer border, light internal rules, a common middle ground
/// between `grid` and `heavy` offered by table-rendering libraries that
/// let the outline stand out from the interior grid.
const MIXED: BoxChars = BoxChars {
    top_left: '┏',
    top_right: '┓',
    bottom_left: '┗',
    bottom_right: '┛',
    cross: '┼',
    tee_down: '┯',
    tee_up: '┷',
    tee_right: '┠',
    tee_left: '┨',
    horizontal: '─',
    vertical: '│',
};

const DOUBLE: BoxChars = BoxChars {
    top_left: '╔',
    top_right: '╗',
    bottom_left: '╚',
    bottom_right: '╝',
    cross: '╬',
    tee_down: '╦',
    tee_up: '╩',
    tee_right: '╠',
    tee_left: '╣',
    horizontal: '═',
    vertical: '║',
};

/// Double outer rule, light interior, `tabulate`'s `fancy_grid` styling.
const FANCY: BoxChars = BoxChars {
    top_left: '╒',
    top_right: '╕',
    bottom_left: '╘',
    bottom_right: '╛',
    cross: '┼',
    tee_down: '╤',
    tee_up: '╧',
    tee_right: '├',
    tee_left: '┤',
    horizontal: '─',
    vertical: '│',
};

fn box_chars(layout: Layout) -> BoxChars {
    match layout {
        Layout::Grid => GRID,
        Layout::Rounded => ROUNDED,
        Layout::Heavy => HEAVY,
        Layout::Mixed => MIXED,
        Layout::Double => DOUBLE,
        Layout::Fancy => FANCY,
        Layout::Hline | Layout::Github | Layout::Plain => unreachable!(
            "{layout:?} is not a box-drawing layout; rendered by its own function"
        ),
    }
}

/// Renders a filled table under the given layout.
pub fn render(layout: Layout, filled: &Filled) -> String {
    match layout {
        Layout::Hline => render_hline(filled),
        Layout::Github => render_github(filled),
        Layout::Plain => render_plain(filled),
        boxed => render_boxed(box_chars(boxed), filled),
    }
}

fn horizontal_rule(chars: &BoxChars, widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut s = String::new();
    s.push(left);
    for (i, &w) in widths.iter().enumerate() {
        if i > 0 {
            s.push(mid);
        }
        s.push_str(&chars.horizontal.to_string().repeat(w + 2));
    }
    s.push(right);
    s
}

fn render_boxed(chars: BoxChars, filled: &Filled) -> String {
    let mut out = String::new();
    out.push_str(&horizontal_rule(
        &chars,
        &filled.widths,
        chars.top_left,
        chars.tee_down,
        chars.top_right,
    ));
    out.push('\n');

    for (r, row) in filled.rows.iter().enumerate() {
        let height = row.first().map(|b| b.len()).unwrap_or(1);
        for line_idx in 0..height {
            out.push(chars.vertical);
            for block in row {
                out.push(' ');
                out.push_str(&block[line_idx]);
                out.push(' ');
                out.push(chars.vertical);
            }
            out.push('\n');
        }

        let is_last = r + 1 == filled.rows.len();
        let (left, mid, right) = if is_last {
            (chars.bottom_left, chars.tee_up, chars.bottom_right)
        } else {
            (chars.tee_right, chars.cross, chars.tee_left)
        };
        out.push_str(&horizontal_rule(&chars, &filled.widths, left, mid, right));
        out.push('\n');
    }

    out
}

fn render_hline(filled: &Filled) -> String {
    let mut out = String::new();
    let double_rule = |widths: &[usize]| -> String {
        widths
            .iter()
            .map(|w| "=".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    };
    let single_rule = |widths: &[usize]| -> String {
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    };

    out.push_str(&double_rule(&filled.widths));
    out.push('\n');

    for (r, row) in filled.rows.iter().enumerate() {
        let height = row.first().map(|b| b.len()).unwrap_or(1);
        for line_idx in 0..height {
            let line = row
                .iter()
                .map(|block| block[line_idx].as_str())
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(&line);
            out.push('\n');
        }

        let is_last = r + 1 == filled.rows.len();
        out.push_str(if is_last {
            &double_rule(&filled.widths)
        } else {
            &single_rule(&filled.widths)
        });
        out.push('\n');
    }

    out
}

fn render_plain(filled: &Filled) -> String {
    let mut out = String::new();
    for row in &filled.rows {
        let height = row.first().map(|b| b.len()).unwrap_or(1);
        for line_idx in 0..height {
            let line = row
                .iter()
                .map(|block| block[line_idx].as_str())
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

/// GitHub-flavored Markdown table: pipe-bordered, with a single
/// `|---|---|` rule after the first row (treated as the header) and no
/// other rules, the format GFM renderers recognize.
fn render_github(filled: &Filled) -> String {
    let mut out = String::new();
    let render_line = |block_row: &[Block], line_idx: usize| -> String {
        let mut s = String::from("|");
        for block in block_row {
            s.push(' ');
            s.push_str(&block[line_idx]);
            s.push_str(" |");
        }
        s
    };

    for (r, row) in filled.rows.iter().enumerate() {
        let height = row.first().map(|b| b.len()).unwrap_or(1);
        for line_idx in 0..height {
            out.push_str(&render_line(row, line_idx));
            out.push('\n');
        }
        if r == 0 && filled.rows.len() > 1 {
            out.push('|');
            for &w in &filled.widths {
                out.push_str(&"-".repeat(w + 2));
                out.push('|');
            }
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn filled_for(rows: Vec<Vec<&str>>, widths: &[usize]) -> Filled {
        let table = Table::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        )
        .unwrap();
        let (filled, _) = fill(&table, widths, &WrapOpts::default());
        filled
    }

    #[test]
    fn grid_has_correct_corner_count() {
        let filled = filled_for(vec![vec!["a", "b"]], &[3, 3]);
        let out = render(Layout::Grid, &filled);
        let top = out.lines().next().unwrap();
        assert_eq!(top.matches('+').count(), 3);
    }

    #[test]
    fn grid_matches_s1_scenario() {
        let filled = filled_for(vec![vec!["a", "b"]], &[3, 3]);
        let out = render(Layout::Grid, &filled);
        let expected = "+-----+-----+\n| a   | b   |\n+-----+-----+\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn data_lines_start_and_end_with_pipe() {
        let filled = filled_for(vec![vec!["a", "bb"], vec!["ccc", "d"]], &[4, 4]);
        let out = render(Layout::Grid, &filled);
        for line in out.lines().filter(|l| !l.starts_with('+')) {
            assert!(line.starts_with('|'));
            assert!(line.ends_with('|'));
        }
    }

    #[test]
    fn cell_display_width_matches_width_plus_padding() {
        let widths = [5usize, 7];
        let filled = filled_for(vec![vec!["hi", "there"]], &widths);
        let out = render(Layout::Grid, &filled);
        let data_line = out.lines().nth(1).unwrap();
        let cells: Vec<&str> = data_line.split('|').filter(|s| !s.is_empty()).collect();
        assert_eq!(dw(cells[0]), widths[0] + 2);
        assert_eq!(dw(cells[1]), widths[1] + 2);
    }

    #[test]
    fn hline_overhead_matches_formula() {
        assert_eq!(Layout::Hline.overhead(3), 4);
        assert_eq!(Layout::Grid.overhead(3), 10);
    }

    #[test]
    fn over_width_is_detected() {
        let table = Table::new(vec![vec!["supercalifragilisticexpialidocious".into()]]).unwrap();
        let mut opts = WrapOpts::default();
        opts.break_long_words = false;
        let (_, over) = fill(&table, &[5], &opts);
        assert_eq!(over, vec![(0, 0)]);
    }
}
