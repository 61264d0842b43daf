//! Drag-and-drop reordering as a pure list operation.
//!
//! The gesture layer reports a source position and where the item was released;
//! [`resolve_destination`] turns that into an insertion index and [`move_item`]
//! produces the reordered sequence.

use anyhow::{bail, ensure};

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Edge {
    Before,
    After,
}

/// Where a dragged item was released.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// Over another item, on the given side of it.
    Item { index: usize, edge: Edge },
    /// Over the list itself but outside any item.
    Container { edge: Edge },
}

/// Resolves a drop target into the index the item occupies after the move.
pub fn resolve_destination(len: usize, source: usize, target: DropTarget) -> anyhow::Result<usize> {
    ensure!(source < len, "source index {source} out of range for {len} items");
    let last = len - 1;

    let index = match target {
        DropTarget::Item { index, edge } => {
            ensure!(index < len, "target index {index} out of range for {len} items");
            if index == source {
                return Ok(source);
            }
            let raw = match edge {
                Edge::Before => index,
                Edge::After => index + 1,
            };
            // Removing the source first shifts everything after it down by one.
            if index > source { raw - 1 } else { raw }
        }
        DropTarget::Container { edge: Edge::Before } => 0,
        DropTarget::Container { edge: Edge::After } => last,
    };

    Ok(index.min(last))
}

/// Moves the element at `source` so that it ends up at `destination`.
pub fn move_item<T: Clone>(items: &[T], source: usize, destination: usize) -> anyhow::Result<Vec<T>> {
    if source >= items.len() || destination >= items.len() {
        bail!(
            "cannot move {source} to {destination} in a list of {} items",
            items.len()
        );
    }

    let mut out = items.to_vec();
    let moved = out.remove(source);
    out.insert(destination, moved);
    Ok(out)
}

pub fn reorder<T: Clone>(items: &[T], source: usize, target: DropTarget) -> anyhow::Result<Vec<T>> {
    let destination = resolve_destination(items.len(), source, target)?;
    move_item(items, source, destination)
}
