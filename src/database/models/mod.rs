pub mod collection;
pub mod recipe;
pub mod user;

pub use collection::{Collection, CollectionDetail};
pub use recipe::Recipe;
pub use user::Creator;
