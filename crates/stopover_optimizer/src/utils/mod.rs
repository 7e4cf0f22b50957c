pub mod cancel;
pub mod newtype_index;
