pub mod banners;
pub mod checkpoint;
pub mod interaction;
pub mod visibility;

pub use banners::dismiss_banners;
pub use checkpoint::{write_json_atomic, write_text_atomic, CheckpointSink, JsonCheckpointWriter};
pub use interaction::{InteractionDriver, InteractionState};
pub use visibility::{RegionSignals, VisibilityOracle};
