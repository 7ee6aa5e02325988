pub mod products;
pub mod user_types;
pub mod users;

pub use products::Entity as Products;
pub use user_types::Entity as UserTypes;
pub use users::Entity as Users;
