//! The column-cost oracle `nl(j, w)`.
//!
//! For a column and a candidate width, reports the number of wrapped lines
//! each cell in that column would need, or [`LineCount::Infinite`] when a
//! cell would overflow its width and the column isn't user-fixed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::model::Table;
use crate::width::dw;
use crate::wrap::{wrap, WrapOpts};

/// A per-row line count, with an explicit infinity sentinel standing in for
/// the source implementation's exception-based signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LineCount {
    Finite(u32),
    Infinite,
}

impl LineCount {
    pub fn is_infinite(self) -> bool {
        matches!(self, LineCount::Infinite)
    }

    pub fn as_finite(self) -> Option<u32> {
        match self {
            LineCount::Finite(n) => Some(n),
            LineCount::Infinite => None,
        }
    }
}

impl std::ops::Add for LineCount {
    type Output = LineCount;
    fn add(self, rhs: LineCount) -> LineCount {
        match (self, rhs) {
            (LineCount::Finite(a), LineCount::Finite(b)) => LineCount::Finite(a + b),
            _ => LineCount::Infinite,
        }
    }
}

impl std::iter::Sum for LineCount {
    fn sum<I: Iterator<Item = LineCount>>(iter: I) -> LineCount {
        iter.fold(LineCount::Finite(0), |acc, x| acc + x)
    }
}

/// Componentwise max of two per-row line-count vectors, used by the planner's
/// recurrence `max(c^{k-1}(w-i), nl(j_k, i))`.
pub fn max_vec(a: &[LineCount], b: &[LineCount]) -> Vec<LineCount> {
    a.iter().zip(b.iter()).map(|(&x, &y)| x.max(y)).collect()
}

/// Evaluates and memoizes `nl(j, w)` for a single table.
///
/// The cache is a simple `RefCell<HashMap>`: the oracle is only ever used
/// from a single thread within one planning pass, so interior mutability is
/// enough and avoids threading `&mut` through the whole DP.
pub struct Oracle<'t> {
    table: &'t Table,
    opts: WrapOpts,
    /// `true` for columns whose width is user-fixed: over-width lines are
    /// accepted (counted normally) instead of being flagged as `Infinite`.
    fixed_columns: Vec<bool>,
    cache: RefCell<HashMap<(usize, usize), Rc<[LineCount]>>>,
}

impl<'t> Oracle<'t> {
    pub fn new(table: &'t Table, opts: WrapOpts, fixed_columns: Vec<bool>) -> Self {
        debug_assert_eq!(fixed_columns.len(), table.n_cols());
        Oracle {
            table,
            opts,
            fixed_columns,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// `nl(column, width)`: line counts for every row of `column` when
    /// wrapped at `width`, memoized per `(column, width)`.
    pub fn nl(&self, column: usize, width: usize) -> Rc<[LineCount]> {
        if let Some(cached) = self.cache.borrow().get(&(column, width)) {
            return Rc::clone(cached);
        }

        let accept_over_width = self.fixed_columns[column];
        let counts: Vec<LineCount> = self
            .table
            .column(column)
            .map(|cell| {
                let lines = wrap(cell, width, &self.opts);
                let over_width = lines.iter().any(|line| dw(line) > width);
                if over_width && !accept_over_width {
                    LineCount::Infinite
                } else {
                    LineCount::Finite(lines.len() as u32)
                }
            })
            .collect();

        let counts: Rc<[LineCount]> = Rc::from(counts.into_boxed_slice());
        self.cache
            .borrow_mut()
            .insert((column, width), Rc::clone(&counts));
        counts
    }

    /// Sum of `nl(column, width)` across all rows, as a single [`LineCount`].
    pub fn nl_sum(&self, column: usize, width: usize) -> LineCount {
        self.nl(column, width).iter().copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn table() -> Table {
        Table::new(vec![
            vec!["short".into(), "a somewhat longer cell of text".into()],
            vec!["x".into(), "y".into()],
        ])
        .unwrap()
    }

    #[test]
    fn finite_counts_match_wrap() {
        let t = table();
        let oracle = Oracle::new(&t, WrapOpts::default(), vec![false, false]);
        let counts = oracle.nl(1, 10);
        assert_eq!(counts.len(), 2);
        assert!(counts[0].as_finite().unwrap() > 1);
        assert_eq!(counts[1], LineCount::Finite(1));
    }

    #[test]
    fn over_width_is_infinite_unless_fixed() {
        let t = Table::new(vec![vec!["supercalifragilisticexpialidocious".into()]]).unwrap();
        let mut opts = WrapOpts::default();
        opts.break_long_words = false;

        let free = Oracle::new(&t, opts.clone(), vec![false]);
        assert_eq!(free.nl(0, 5)[0], LineCount::Infinite);

        let fixed = Oracle::new(&t, opts, vec![true]);
        assert!(fixed.nl(0, 5)[0].as_finite().is_some());
    }

    #[test]
    fn is_memoized() {
        let t = table();
        let oracle = Oracle::new(&t, WrapOpts::default(), vec![false, false]);
        let first = oracle.nl(0, 6);
        let second = oracle.nl(0, 6);
        assert!(Rc::ptr_eq(&first, &second));
    }

    #[test]
    fn monotonic_non_increasing_in_width() {
        let t = table();
        let oracle = Oracle::new(&t, WrapOpts::default(), vec![false, false]);
        for col in 0..t.n_cols() {
            let mut prev = vec![LineCount::Finite(u32::MAX); t.n_rows()];
            for w in 2..30 {
                let cur = oracle.nl(col, w);
                for (p, c) in prev.iter().zip(cur.iter()) {
                    assert!(c <= p, "width {w} increased a line count");
                }
                prev = cur.to_vec();
            }
        }
    }
}
