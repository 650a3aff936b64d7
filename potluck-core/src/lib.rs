pub mod access;
pub mod actions;
pub mod auth;
pub mod content;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod image;
pub mod session;
pub mod slug;
pub mod store;
pub mod types;
pub mod validation;

pub use access::RecipeAccess;
pub use actions::RecipeActions;
pub use auth::AuthService;
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use error::{ActionError, BlobError, FieldErrors, IdentityError, StoreError};
pub use favorites::{Favorites, FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
pub use filter::RecipeFilter;
pub use image::{validate_image, MAX_FILE_SIZE};
pub use session::{SessionState, SessionStore};
pub use slug::slugify;
pub use store::{
    BlobStore, IdentityProvider, MemoryBlobStore, MemoryIdentityProvider, MemoryRecipeStore,
    RecipeOrder, RecipeQuery, RecipeStore, StoredBlob,
};
pub use types::{
    Category, Difficulty, Identity, ImageUpload, NewRecipe, Page, Recipe, RecipeChanges,
    RecipeForm, Session,
};
pub use validation::{SignInForm, SignUpForm};
