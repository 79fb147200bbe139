//! Integration tests for colwarm.
//!
//! These tests require LocalStack to be running; they skip themselves when it
//! is not reachable.
//!
//! ## Running Integration Tests
//!
//! 1. Start LocalStack:
//!    ```bash
//!    docker run --rm -p 4566:4566 localstack/localstack
//!    ```
//!
//! 2. Run the integration tests:
//!    ```bash
//!    LOCALSTACK_ENDPOINT=http://localhost:4566 cargo test -p cw-integration-tests
//!    ```

mod common;
mod prefetch_test;
