pub mod cdp_page;
pub mod page_controller;
pub mod scripts;
pub mod wait;

pub use cdp_page::CdpPage;
pub use page_controller::{BoundingBox, PageController, Point, Target, WaitUntil};
pub use scripts::{ContentProbe, Script};
pub use wait::poll_until;
