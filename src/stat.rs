use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub expanded_nodes: usize,
    pub generated_nodes: usize,
    pub filtered_nodes: usize,
    pub duplicate_nodes: usize,
    pub max_frontier: usize,
    pub time_us: usize,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Time(microseconds) {:?} Expanded nodes: {:?} Generated nodes: {:?} Filtered: {:?} Duplicates: {:?} Max frontier: {:?}",
            self.time_us,
            self.expanded_nodes,
            self.generated_nodes,
            self.filtered_nodes,
            self.duplicate_nodes,
            self.max_frontier
        );
    }
}
