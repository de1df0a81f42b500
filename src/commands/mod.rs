// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod trades;
pub mod finances;
pub mod objectives;
pub mod subscriptions;
pub mod groups;
pub mod checklist;
pub mod reports;
pub mod settings;
pub mod importer;
pub mod exporter;
pub mod doctor;
