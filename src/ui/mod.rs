pub mod icons;
pub mod output;
pub mod progress;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{entry_failed, entry_inserted, entry_skipped, error, phase, section, status, success};
pub use progress::Spinner;
pub use table::{render, TableBuilder};
pub use theme::{theme, Theme};
