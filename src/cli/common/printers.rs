// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Printing summaries and warnings as little trees.

use std::{borrow::Cow, sync::Mutex};

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

lazy_static::lazy_static! {
    static ref WARNINGS: Mutex<Vec<Vec<Cow<'static, str>>>> = Mutex::new(vec![]);
}

/// Prefix each line of each block with a tree symbol. The first line of a
/// block branches off the tree, the rest hang off the branch, and the very
/// last block closes the tree.
pub(super) fn tree_lines(blocks: &[Vec<Cow<'static, str>>]) -> Vec<String> {
    let num_blocks = blocks.len();
    blocks
        .iter()
        .enumerate()
        .flat_map(|(i_block, block)| {
            let last_block = i_block + 1 == num_blocks;
            let num_lines = block.len();
            block.iter().enumerate().map(move |(i_line, line)| {
                let symbol = match (i_line, num_lines == 1 && last_block) {
                    (0, true) => UP_AND_RIGHT,
                    (0, false) => VERTICAL_AND_RIGHT,
                    _ => VERTICAL,
                };
                format!("{symbol} {line}")
            })
        })
        .collect()
}

/// Collects lines of information under a title, printed at info level.
pub(crate) struct InfoPrinter {
    title: Cow<'static, str>,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl InfoPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            blocks: vec![],
        }
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        self.blocks.push(block);
    }

    pub(crate) fn display(self) {
        log::info!("{}", console::style(self.title).bold());
        for line in tree_lines(&self.blocks) {
            log::info!("{line}");
        }
        log::info!("");
    }
}

/// Something that can be put aside as a warning, to be shown to the user with
/// [display_warnings].
pub(crate) trait Warn {
    fn warn(self);
}

fn push_warning(block: Vec<Cow<'static, str>>) {
    match WARNINGS.lock() {
        Ok(mut w) => w.push(block),
        // Another thread panicked while holding the lock; log directly.
        Err(_) => block.iter().for_each(|line| log::warn!("{line}")),
    }
}

impl Warn for &'static str {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for String {
    fn warn(self) {
        push_warning(vec![self.into()]);
    }
}

impl Warn for Cow<'static, str> {
    fn warn(self) {
        push_warning(vec![self]);
    }
}

impl Warn for Vec<Cow<'static, str>> {
    fn warn(self) {
        push_warning(self);
    }
}

/// Print any warnings that have been collected, then forget them.
pub(crate) fn display_warnings() {
    let blocks = match WARNINGS.lock() {
        Ok(mut w) => std::mem::take(&mut *w),
        Err(_) => return,
    };
    log::debug!("Displaying warnings");
    if blocks.is_empty() {
        return;
    }

    log::warn!("{}", console::style("Warnings").bold());
    for line in tree_lines(&blocks) {
        log::warn!("{line}");
    }
    log::warn!("");
}
