//! Plain-text matrix rendering.

use capgrid_core::{GridService, SnapshotStore};

const NAME_WIDTH: usize = 18;
const CELL_WIDTH: usize = 14;

/// Renders dimensions as rows and subjects as columns, followed by totals.
pub fn matrix<S: SnapshotStore>(service: &GridService<S>) -> String {
    let store = service.store();
    let mut out = format!("{:<NAME_WIDTH$}", "Dimension");
    for subject in store.subjects() {
        out.push_str(&format!("{:>CELL_WIDTH$}", clip(&subject.name, CELL_WIDTH - 1)));
    }
    out.push('\n');

    for dimension in store.dimensions() {
        out.push_str(&format!("{:<NAME_WIDTH$}", clip(&dimension.name, NAME_WIDTH - 1)));
        for subject in store.subjects() {
            let marker = if subject.descriptions.get(&dimension.id).is_some() {
                "*"
            } else {
                " "
            };
            let cell = format!("{}{marker}", subject.scores.get(&dimension.id));
            out.push_str(&format!("{cell:>CELL_WIDTH$}"));
        }
        out.push_str(&format!("  [{}]\n", dimension.id));
    }

    out.push_str(&format!("{:<NAME_WIDTH$}", "Total"));
    for total in service.totals() {
        out.push_str(&format!("{:>CELL_WIDTH$}", format!("{} ", total.total)));
    }
    out.push('\n');

    let leader = match service.leader() {
        Some(leader) => format!("Leader: {} [{}]\n", leader.name, leader.id),
        None => "Leader: none\n".to_string(),
    };
    out.push_str(&leader);
    out
}

fn clip(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut clipped = value.chars().take(max_chars.saturating_sub(1)).collect::<String>();
    clipped.push('~');
    clipped
}
