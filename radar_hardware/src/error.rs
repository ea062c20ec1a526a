use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("radar worker disconnected")]
    Disconnected,
}
