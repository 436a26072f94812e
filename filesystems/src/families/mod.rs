// Filesystem families
pub mod fat;
