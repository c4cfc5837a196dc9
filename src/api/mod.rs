pub mod media;

pub use media::{CollectionView, CreatorStatus, MediaUrls, RecipeView, DEFAULT_COVER};
