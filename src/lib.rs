//! # Interchain Query SDK
//!
//! A Rust library for cached query-client access to Cosmos SDK chains. It
//! resolves a chain name to live endpoints, builds a typed query client over
//! them, and keeps that client cached for as long as the caller stays on the
//! same chain.
//!
//! ## Overview
//!
//! The SDK separates endpoint plumbing from the queries callers actually care
//! about. It focuses on:
//!
//! - **Client caching**: One client per component, rebuilt only on key change
//! - **Endpoint resolution**: Configured overrides first, chain registry second
//! - **Bank queries**: Balances in base and display denominations
//! - **Transfer composition**: Bank sends handed to an external signing backend
//!
//! ## Architecture
//!
//! The SDK is organized into several layers:
//!
//! ### Cache Layer
//! A single-slot keyed cache holds the client for the most recently requested
//! chain; a factory seam decides how clients are built.
//!
//! ### Resolution Layer
//! Chain names resolve to endpoint sets through configuration or a remote
//! registry directory, with memoization and retry.
//!
//! ### Query Layer
//! A capability-typed client exposes exactly the reads the SDK needs (chain
//! id, bank balances) over a chain's REST gateway.
//!
//! ### Transfer Layer
//! Bank sends are composed as proto-JSON messages and broadcast through a
//! caller-provided signing backend; the SDK never holds keys.

// Core Types
/// Coins, asset metadata and denomination conversions
pub mod types;

// Cache Layer
/// Single-slot keyed client cache and factory seam
pub mod client_cache;
/// Registry-driven query client factory
pub mod client_factory;

// Resolution Layer
/// Chain registry endpoint resolution
pub mod registry;

// Query Layer
/// Capability-typed query clients
pub mod query_client;
/// Bank balance wrappers
pub mod bank;

// Transfer Layer
/// Bank send composition and the signing seam
pub mod tx;

// Infrastructure
/// Metrics and observability
pub mod metrics;
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use bank::BankQuerier;
pub use client_cache::{ClientCache, ClientFactory};
pub use client_factory::RegistryClientFactory;
pub use query_client::{ClientError, HttpQueryClient, QueryClient};
pub use registry::{ChainEndpoints, ChainRegistry, RegistryError};
pub use settings::Settings;
pub use tx::{send_tokens, Fee, MsgSend, SendRequest, SigningClient, TxResponse};
pub use types::{AssetInfo, Coin, DenomUnit};
