// 服务器模块入口
// 提供监听器创建、连接处理和优雅关闭

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::serve;
pub use signal::{start_signal_handler, SignalHandler};
