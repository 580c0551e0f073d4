pub mod codec;
pub mod table;

pub use codec::SheetConfig;
pub use table::Row;
