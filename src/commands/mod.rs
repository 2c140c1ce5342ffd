// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod summaries;
pub mod services;
pub mod pin;
pub mod dashboard;
pub mod backup;
pub mod exporter;
pub mod prefs;
pub mod doctor;
