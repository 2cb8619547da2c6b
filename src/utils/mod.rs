pub mod helpers;
pub mod logging;

pub use helpers::{parse_json_from_class, slug_from_url};
pub use logging::truncate_text;
