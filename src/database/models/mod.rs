pub mod category;
pub mod product;
pub mod profile;
pub mod user;

pub use category::Category;
pub use product::Product;
pub use profile::Profile;
pub use user::User;
