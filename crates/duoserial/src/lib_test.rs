// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tests for the library root.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;

#[test]
fn test_version_not_empty() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_control_bytes() {
    assert_eq!(CANCEL, 0x18);
    assert_eq!(BACKSPACE, b'\x08');
    assert_eq!(LinkError::Timeout.to_sentinel(), CANCEL);
}

#[test]
fn test_default_budgets_favour_the_operator() {
    // The console waits for a human, the instrument for a machine.
    let TimeoutBudget::Ticks(console) = Budgets::CONSOLE.receive else {
        panic!("console receive budget must be bounded");
    };
    let TimeoutBudget::Ticks(instrument) = Budgets::INSTRUMENT.receive else {
        panic!("instrument receive budget must be bounded");
    };
    assert!(console > instrument);
    assert_eq!(Budgets::CONSOLE.transmit, Budgets::INSTRUMENT.transmit);
}
