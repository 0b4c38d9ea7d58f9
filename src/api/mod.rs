pub mod export;
pub mod loaders;
pub mod upload;
