//! # Receiptly Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          receipts (binary)                              │
//! │                                                                         │
//! │  main.rs ────► starts the tokio runtime                                 │
//! │  lib.rs  ────► parses arguments, logging, config, opens the store       │
//! │  commands/ ──► settings, receipt, backup                                │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                         SQLite Database                          │  │
//! │  │  receipts.db (local file, WAL mode, key-value records)           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for testability
    receipts_cli::run().await
}
