pub mod app;
pub mod config;
pub mod context;
pub mod events;

pub mod sys {
    pub mod runtime;
    pub mod server;
}
