mod combobox_component;
mod keys;
mod state;

pub use combobox_component::ComboboxComponent;
pub use keys::ComboboxEvent;
pub use state::ComboboxState;
