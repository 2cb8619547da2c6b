pub mod link_list;

pub use link_list::{load_link_list, parse_link_list};
