pub mod baseline;
pub mod evaluate;
pub mod init;
pub mod instances;
pub mod validate;
