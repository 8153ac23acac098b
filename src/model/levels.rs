//! Multi-byte values spread over sibling channels, and bulk level operations
//! on target roles.

use super::{Channel, Fraction, Instrument, Selector, Target, Universe, MAX_VALUE_BYTES};

/// Largest value that fits into `bytes` bytes, i.e. `2^(8 * bytes) - 1`.
pub fn full_scale(bytes: usize) -> u64 {
    match bytes.min(MAX_VALUE_BYTES) {
        0 => 0,
        bytes => u64::MAX >> (64 - 8 * bytes),
    }
}

/// Split a selection of channel indices into groups of siblings, in order of
/// first appearance. Each group carries one multi-byte value.
pub fn sibling_groups(channels: &[Channel], selection: &[usize]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for &index in selection {
        let Some(channel) = channels.get(index) else {
            continue;
        };
        let existing = groups.iter_mut().find(|g| {
            g.first()
                .and_then(|&first| channels.get(first))
                .is_some_and(|first| first.is_sibling_of(channel))
        });
        match existing {
            Some(group) => group.push(index),
            None => groups.push(vec![index]),
        }
    }
    groups
}

/// Assemble the value carried by a group of siblings.
pub fn gather(channels: &[Channel], group: &[usize]) -> u64 {
    group
        .iter()
        .filter_map(|&i| channels.get(i))
        .fold(0, |acc, c| acc | (c.value as u64) << (8 * c.value_index() as u32))
}

/// Store `value` in a group of siblings, each channel receiving the byte at its
/// value index.
pub fn distribute(channels: &mut [Channel], group: &[usize], value: u64) -> bool {
    let mut changed = false;
    for &i in group {
        if let Some(channel) = channels.get_mut(i) {
            let byte = (value >> (8 * channel.value_index() as u32)) as u8;
            changed |= channel.value != byte;
            channel.value = byte;
        }
    }
    changed
}

impl Instrument {
    /// Sibling groups of all channels with the given target role.
    fn target_groups(&self, target: Target) -> Vec<Vec<usize>> {
        sibling_groups(self.channels(), &self.select(&Selector::Target(target)))
    }

    /// Normalized level of each sibling group with the given target role.
    pub fn levels(&self, target: Target) -> Vec<f64> {
        self.target_groups(target)
            .iter()
            .map(|g| gather(self.channels(), g) as f64 / full_scale(g.len()) as f64)
            .collect()
    }

    /// Rewrite every sibling group of `target` with `f(current, full_scale)`.
    fn map_levels<F: Fn(u64, u64) -> u64>(&mut self, target: Target, f: F) -> bool {
        let mut changed = false;
        for group in self.target_groups(target) {
            let old = gather(self.channels(), &group);
            let new = f(old, full_scale(group.len()));
            changed |= distribute(self.channels_mut(), &group, new);
        }
        changed
    }
}

impl Universe {
    /// Set every channel with the given target role to `level`. Returns
    /// whether any channel changed.
    pub fn set_levels(&mut self, target: Target, level: Fraction) -> bool {
        self.map_levels(target, |_, full| level.of(full))
    }

    /// Lower every value of the given target role that is above `level` down
    /// to it.
    pub fn lower_levels_to(&mut self, target: Target, level: Fraction) -> bool {
        self.map_levels(target, |old, full| old.min(level.of(full)))
    }

    /// Raise every value of the given target role that is below `level` up to
    /// it.
    pub fn raise_levels_to(&mut self, target: Target, level: Fraction) -> bool {
        self.map_levels(target, |old, full| old.max(level.of(full)))
    }

    /// Highest normalized level of the given target role, or `None` if no
    /// instrument has such a channel.
    pub fn max_level(&self, target: Target) -> Option<f64> {
        self.all_levels(target).reduce(f64::max)
    }

    /// Lowest normalized level of the given target role, or `None` if no
    /// instrument has such a channel.
    pub fn min_level(&self, target: Target) -> Option<f64> {
        self.all_levels(target).reduce(f64::min)
    }

    fn all_levels(&self, target: Target) -> impl Iterator<Item = f64> + '_ {
        self.instruments()
            .iter()
            .flat_map(move |i| i.levels(target))
    }

    fn map_levels<F: Fn(u64, u64) -> u64>(&mut self, target: Target, f: F) -> bool {
        let mut changed = false;
        for instrument in self.instruments_mut() {
            changed |= instrument.map_levels(target, &f);
        }
        changed
    }
}
