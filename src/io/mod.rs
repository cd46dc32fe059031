// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for map images and settings files.

pub mod clipboard;
pub mod media;
pub mod serialization;
