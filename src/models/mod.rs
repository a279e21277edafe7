// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: labels, the loaded sheet and the draw tool.

pub mod draw;
pub mod label;
pub mod label_list;
pub mod sheet;
