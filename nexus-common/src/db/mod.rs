//! Shared database access for Nexus

pub mod init;
