//! HTTP服务器模块：网关路由、状态与中间件
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use state::AppState;
