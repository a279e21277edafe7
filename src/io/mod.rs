// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: sheet images, label files and the label services.

pub mod client;
pub mod media;
pub mod serialization;
