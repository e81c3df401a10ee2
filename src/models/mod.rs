pub mod event;
pub mod option;
pub mod reception;

pub use event::ReceptionEvent;
pub use option::MetadataOption;
pub use reception::{Category, Reception};
