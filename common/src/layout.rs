use itertools::iproduct;
use serde::Serialize;
use tracing::warn;

use crate::config::InputFile;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum SlotKey {
    NativeOpt,
    Comparison { source_file: String, name: String },
    Io,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slot {
    pub key: SlotKey,
    /// Multiple of the bar width relative to the group centre
    pub offset: i32,
}

/// Bar positions shared by every panel.
///
/// Within a group the native opt bar sits at offset -1, the comparison bars
/// follow file-major at 0, 1, 2, ... and the io bar takes the last offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub positions: Vec<f64>,
    pub bar_width: f64,
    pub slots: Vec<Slot>,
}

impl Layout {
    pub fn new(
        group_count: usize,
        file_names: &[InputFile],
        comparison_names: &[String],
        bar_width: f64,
    ) -> Self {
        let comparisons = iproduct!(file_names, comparison_names).map(|(file, name)| {
            SlotKey::Comparison {
                source_file: file.file.clone(),
                name: name.clone(),
            }
        });
        let slots = std::iter::once(SlotKey::NativeOpt)
            .chain(comparisons)
            .chain(std::iter::once(SlotKey::Io))
            .zip(-1..)
            .map(|(key, offset)| Slot { key, offset })
            .collect::<Vec<_>>();

        let max_width = 1.0 / slots.len() as f64;
        let bar_width = if bar_width > max_width {
            warn!(
                "Bar width {bar_width} overlaps neighbouring groups with {} slots, using {max_width:.4}",
                slots.len()
            );
            max_width
        } else {
            bar_width
        };

        Self {
            positions: (0..group_count).map(|i| i as f64).collect(),
            bar_width,
            slots,
        }
    }

    pub fn slots_per_group(&self) -> usize {
        self.slots.len()
    }

    pub fn offset_of(&self, key: &SlotKey) -> Option<i32> {
        self.slots.iter().find(|s| &s.key == key).map(|s| s.offset)
    }

    /// Centre of the bar for `slot` in group `group`
    pub fn x(&self, group: usize, slot: &Slot) -> f64 {
        self.positions[group] + slot.offset as f64 * self.bar_width
    }

    /// Horizontal extent covered by the bars of a group
    pub fn group_span(&self, group: usize) -> (f64, f64) {
        let first = self.slots.first().map_or(0, |s| s.offset) as f64;
        let last = self.slots.last().map_or(0, |s| s.offset) as f64;
        let centre = self.positions[group];
        (
            centre + (first - 0.5) * self.bar_width,
            centre + (last + 0.5) * self.bar_width,
        )
    }
}
