// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem: input files and terminal reports

pub mod reporter;
pub mod scene;

pub use reporter::Reporter;
pub use scene::{load_mesh, CheckReport, EvalReport, Scene};
