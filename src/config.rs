//! Centralized defaults, shared by the CLI parser and any future
//! config-file or environment-variable layer.

use crate::layout::Layout;

pub const DEFAULT_LAYOUT: Layout = Layout::Grid;
pub const DEFAULT_DELIMITER: u8 = b'\t';
pub const DEFAULT_BREAK_LONG_WORDS: bool = true;
pub const DEFAULT_TABLE_WIDTH: usize = 80;
