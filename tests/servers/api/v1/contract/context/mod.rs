pub mod file;
pub mod health_check;
pub mod play;
pub mod torrent;
