// ABOUTME: Command modules for spotter-cli
// ABOUTME: One module per subcommand
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

pub mod generate;
pub mod validate;
