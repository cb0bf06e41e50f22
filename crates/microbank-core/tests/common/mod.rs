//! Shared fakes for the integration tests: captured log events, scripted
//! attempt outcomes and in-process stream handles.

#![allow(dead_code)]

pub mod logs;
pub mod script;
pub mod streams;
