pub mod connection;
pub mod ensure_host;
pub mod import_template;
pub mod output;
pub mod wait;

pub use connection::ConnectionArgs;
pub use ensure_host::EnsureHostCommand;
pub use import_template::ImportTemplateCommand;
pub use wait::WaitCommand;

/// Single-threaded runtime: every flow issues one request at a time
pub fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
