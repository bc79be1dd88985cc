mod card_grid;
mod command_input;
mod detail_overlay;
mod filter_bar;
mod input;
mod key_result;
mod option_picker;
mod search_input;

pub use card_grid::CardGrid;
pub use command_input::{CommandEvent, CommandInput};
pub use detail_overlay::{DetailEvent, DetailOverlay};
pub use filter_bar::FilterBar;
pub use key_result::KeyResult;
pub use option_picker::{OptionPicker, PickerEvent, PickerOption};
pub use search_input::{SearchEvent, SearchInput};
