pub mod education;
pub mod experience;
pub mod personal;
pub mod projects;
pub mod skills;
