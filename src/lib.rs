//! `wraptab`: a column-width planner and renderer for fixed-width plaintext
//! tables. See each module's docs for its piece of the pipeline: parse, plan,
//! wrap, fill, render.

pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod oracle;
pub mod parse;
pub mod planner;
pub mod width;
pub mod wrap;

use error::Result;
use layout::Layout;
use model::{Table, UserWidth, UserWidths};
use oracle::Oracle;
use planner::{Planner, PlannerMode};
use wrap::WrapOpts;

/// Everything the driver needs to run one planning pass, gathered so `main`
/// and the integration tests can both drive the pipeline without duplicating
/// argument plumbing.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub table_width: usize,
    pub layout: Layout,
    pub strict: bool,
    pub wrap_opts: WrapOpts,
    pub brute: bool,
}

/// The result of a full parse → plan → wrap → fill pass, ready to render.
pub struct Planned {
    pub widths: Vec<usize>,
    pub filled: layout::Filled,
    pub over_width: Vec<(usize, usize)>,
}

/// Runs plan → wrap → fill for an already-parsed `table`, given its
/// (possibly partial) user widths and the run options.
///
/// This is the reusable core of the driver: `main` wires it to argv and
/// process exit, while tests call it directly against constructed tables.
pub fn plan_and_fill(
    table: &Table,
    user_widths: &UserWidths,
    opts: &RunOptions,
) -> Result<Planned> {
    let overhead = opts.layout.overhead(table.n_cols());
    let budget = (opts.table_width as i64 - overhead as i64).max(0) as usize;
    if (opts.table_width as i64) < overhead as i64 {
        return Err(error::WraptabError::PlanningInfeasible {
            budget: opts.table_width as i64 - overhead as i64,
        });
    }

    let fixed_columns: Vec<bool> = user_widths
        .as_slice()
        .iter()
        .map(|w| matches!(w, UserWidth::Fixed(_)))
        .collect();

    let oracle = Oracle::new(table, opts.wrap_opts.clone(), fixed_columns);
    let mode = if opts.brute {
        PlannerMode::Brute
    } else {
        PlannerMode::Bisect
    };
    let planner = Planner::new(&oracle, user_widths.as_slice(), table.n_rows(), mode);
    let widths = planner.plan(budget)?;

    let (filled, over_width) = layout::fill(table, &widths, &opts.wrap_opts);

    if !over_width.is_empty() {
        if opts.strict {
            let (_, col) = over_width[0];
            return Err(error::WraptabError::OverWidth {
                column: col,
                width: widths[col],
            });
        } else {
            log::warn!(
                "{} cell(s) exceed their column width; rendering proceeds raggedly (pass --strict to treat this as an error)",
                over_width.len()
            );
        }
    }

    Ok(Planned {
        widths,
        filled,
        over_width,
    })
}
