//! # Voxel Chunks Demo
//!
//! Headless entry point. Streams a world around a walking observer and logs what
//! every tick did.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [world-config.json]
//! ```

use std::{path::PathBuf, process::ExitCode};

fn main() -> ExitCode {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);

    match voxel_chunks::run(config_path.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}
