pub mod subscription;
pub mod token;
