pub mod admin;
pub mod ai;
pub mod blueprints;
pub mod community;
pub mod profile;
