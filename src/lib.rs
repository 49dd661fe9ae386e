mod database {
    pub mod actions;
    pub mod connect;
    pub mod error;
    pub mod pagination;
    pub mod schema;
}
mod server {
    pub mod handlers;
    pub mod routes;
}
mod config;
mod constants;

pub mod seed;

pub use config::*;
pub use constants::*;
pub use database::*;
pub use server::*;
