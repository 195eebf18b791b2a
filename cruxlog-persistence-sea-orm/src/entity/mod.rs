pub mod climb;
pub mod feedback;
pub mod gym;
pub mod route;
pub mod user;
