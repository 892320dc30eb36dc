pub mod domain;
pub mod granter;
pub mod service;
