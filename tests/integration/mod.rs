//! Integration tests for the Maia resolution core

mod concurrent_registration;
mod container_resolution;
mod role_attachment;
mod support;
