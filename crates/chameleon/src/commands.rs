//! Various commands that can be executed by chameleon
mod create;
mod variablize;

pub use create::Create;
pub use variablize::Variablize;
