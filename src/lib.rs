//! Workspace-level integration tests for mpnum live under `tests/`.
