//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod budget;
pub mod budget_estimate;
pub mod cart;
pub mod classification;
pub mod product;
pub mod product_review;
pub mod selected_product;
pub mod shop;
pub mod user;
pub mod user_profile;
pub mod wishlist;

// Re-export specific types to avoid conflicts
pub use budget::{Column as BudgetColumn, Entity as Budget, Model as BudgetModel};
pub use budget_estimate::{
    Column as BudgetEstimateColumn, Entity as BudgetEstimate, Model as BudgetEstimateModel,
};
pub use cart::{Column as CartColumn, Entity as Cart, Model as CartModel};
pub use classification::{
    Column as ClassificationColumn, Entity as Classification, Model as ClassificationModel,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_review::{
    Column as ProductReviewColumn, Entity as ProductReview, Model as ProductReviewModel,
};
pub use selected_product::{
    Column as SelectedProductColumn, Entity as SelectedProduct, Model as SelectedProductModel,
};
pub use shop::{Column as ShopColumn, Entity as Shop, Model as ShopModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_profile::{
    Column as UserProfileColumn, Entity as UserProfile, Model as UserProfileModel,
};
pub use wishlist::{Column as WishlistColumn, Entity as Wishlist, Model as WishlistModel};
