//! Token Lifecycle
//!
//! The token lifecycle manager and its durable storage backends.
//!
//! This module provides:
//!
//! - **Token Storage**: file-backed, in-memory, and mock backends with
//!   runtime availability probing
//! - **Token Manager**: the single-slot lifecycle state machine

pub mod manager;
pub mod storage;

// Token Storage
pub use storage::{
    create_in_memory_token_storage, create_mock_token_storage, FileTokenStorage,
    InMemoryTokenStorage, MockTokenStorage, TokenStorage,
};

// Token Manager
pub use manager::{
    create_file_backed_token_manager, create_token_manager, TokenManager, RENEWAL_BUFFER_SECS,
};
