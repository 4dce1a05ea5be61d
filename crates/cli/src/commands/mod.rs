pub mod auth;
pub mod issues;
pub mod projects;
