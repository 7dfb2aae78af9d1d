pub mod csrf;
pub mod headers;
pub mod media;
pub mod projects;
pub mod team;
