//! Grouped, sorted, and filtered views derived from a loaded snapshot.
//!
//! Everything here is a pure function over borrowed collections: same
//! snapshot in, bit-identical result out. The topic cloud, category chart,
//! timeline, and insight table all read from this crate.

pub mod stats;
pub mod table;
pub mod topics;

pub use stats::{
    active_category_count, recent_count, timeline_points, TimelinePoint, RECENT_WINDOW_DAYS,
};
pub use table::{
    distinct_sources, table_rows, Direction, TableColumn, TableFilter, TableRow, TableSort,
};
pub use topics::{
    anchor_category_groups, insight_category_counts, rank_category, topic_weights, RankOrder,
    TopicWeight, RANK_LIMIT,
};
