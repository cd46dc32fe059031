// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Measurement data model: points, segments, calibration and session state.

pub mod calibration;
pub mod segment;
pub mod session;
