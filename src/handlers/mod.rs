pub mod audit_handlers;
pub mod auth_handlers;
pub mod bulletin_handlers;
pub mod category_handlers;
pub mod dashboard;
pub mod feed_handlers;
pub mod menu_handlers;
pub mod story_handlers;
pub mod translation_handlers;
pub mod user_handlers;
