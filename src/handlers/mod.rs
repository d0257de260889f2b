// handlers/mod.rs - one module per resource
//
// Role requirements are part of each handler's signature:
// no auth extractor = public, `AuthUser` = signed in, `AdminUser` = ROLE_ADMIN.

pub mod categories;
pub mod products;
pub mod profile;
pub mod system;
