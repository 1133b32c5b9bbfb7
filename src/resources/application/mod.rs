pub mod accessor;
pub mod collection;
pub mod context;
