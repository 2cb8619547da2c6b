pub mod champion;
pub mod loaders;
pub mod record;
pub mod unit;
pub mod value;

pub use champion::{ChampionProfile, ChampionRecord, LevelStats};
pub use loaders::{load_link_list, parse_link_list};
pub use record::{ExtractionRecord, UnitOutcome};
pub use unit::{UnitAddress, UnitId, WorkUnit};
pub use value::{parse_digits, parse_number_text, NumberOrText};
