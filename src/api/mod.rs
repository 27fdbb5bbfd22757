pub mod click;

pub use click::{ClickService, click_routes};
