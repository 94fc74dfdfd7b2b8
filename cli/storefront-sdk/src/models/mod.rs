pub mod featured;
pub mod home;
pub mod notification;
pub mod page;
