pub mod codegen;
pub mod shorturl;
